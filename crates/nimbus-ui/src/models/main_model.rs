//! State holder of the main (paged) weather screen.
//!
//! Owns the location list and the displayed selection, publishes the
//! displayed location with its load status and the paging indicator, and
//! decides between serving cached weather and starting a refresh.

use std::sync::mpsc::{self, Receiver, Sender};

use nimbus_core::AppError;
use nimbus_weather::Location;

use crate::context::MainContext;
use crate::observable::Observable;
use crate::services::{FetchEvent, FetchRequest, PermissionOutcome, WeatherRepository};

/// Transient message shown when the displayed place was refreshed by a background job.
pub const UPDATED_IN_BACKGROUND_MESSAGE: &str = "Updated in background";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceStatus {
    Loading,
    Success,
    Error,
}

/// What produced a published state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceSource {
    /// User navigation or a user-triggered refresh
    Foreground,
    /// Background update job, or a non-interactive failure
    Background,
}

/// The displayed location together with its load status.
#[derive(Debug, Clone)]
pub struct LocationResource {
    pub status: ResourceStatus,
    pub location: Location,
    pub source: ResourceSource,
}

impl LocationResource {
    pub fn loading(location: Location) -> Self {
        Self {
            status: ResourceStatus::Loading,
            location,
            source: ResourceSource::Foreground,
        }
    }

    pub fn success(location: Location, source: ResourceSource) -> Self {
        Self {
            status: ResourceStatus::Success,
            location,
            source,
        }
    }

    pub fn error(location: Location, source: ResourceSource) -> Self {
        Self {
            status: ResourceStatus::Error,
            location,
            source,
        }
    }

    pub fn is_updated_in_background(&self) -> bool {
        self.status == ResourceStatus::Success && self.source == ResourceSource::Background
    }
}

/// Paging indicator: `index` of `total` distinct pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Indicator {
    pub total: usize,
    pub index: usize,
}

impl Default for Indicator {
    fn default() -> Self {
        Self { total: 1, index: 0 }
    }
}

pub struct MainModel {
    current_location: Observable<LocationResource>,
    indicator: Observable<Indicator>,

    locations: Vec<Location>,
    current_position_index: Option<usize>,
    current_index: usize,

    repository: Option<Box<dyn WeatherRepository>>,
    events_tx: Sender<FetchEvent>,
    events_rx: Receiver<FetchEvent>,
    next_request_id: u64,
    /// Only the completion of this request is applied
    pending_request: Option<u64>,
}

impl Default for MainModel {
    fn default() -> Self {
        Self::new()
    }
}

impl MainModel {
    pub fn new() -> Self {
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            current_location: Observable::new(),
            indicator: Observable::with_value(Indicator::default()),
            locations: Vec::new(),
            current_position_index: None,
            current_index: 0,
            repository: None,
            events_tx,
            events_rx,
            next_request_id: 0,
            pending_request: None,
        }
    }

    /// Reload every location (with weather) and display the one matching
    /// `formatted_id`, or the first one.
    ///
    /// # Panics
    /// The store must return at least one location.
    pub async fn init<C: MainContext + ?Sized>(&mut self, ctx: &C, formatted_id: Option<&str>) {
        if self.repository.is_none() {
            self.repository = Some(ctx.create_repository());
        }

        let store = ctx.store();
        self.locations = store.read_location_list();
        self.current_position_index = None;
        self.current_index = 0;

        for (i, location) in self.locations.iter_mut().enumerate() {
            location.weather = store.read_weather(location);
            if location.current_position {
                self.current_position_index = Some(i);
            }
            if formatted_id.is_some_and(|id| location.matches_id(id)) {
                self.current_index = i;
            }
        }

        tracing::info!(
            "Main screen loaded {} locations, displaying index {}",
            self.locations.len(),
            self.current_index
        );

        self.set_location(ctx, true, ResourceSource::Foreground).await;
    }

    pub async fn init_with_location<C: MainContext + ?Sized>(
        &mut self,
        ctx: &C,
        location: &Location,
    ) {
        let formatted_id = location.formatted_id();
        self.init(ctx, Some(&formatted_id)).await;
    }

    /// Reload from persistence keeping the displayed location.
    pub async fn reset<C: MainContext + ?Sized>(&mut self, ctx: &C) {
        if let Some(location) = self.current_location_value() {
            let formatted_id = location.formatted_id();
            self.init(ctx, Some(&formatted_id)).await;
        }
    }

    /// Move the selection by `offset` pages; `0` only re-checks freshness.
    pub async fn select_by_offset<C: MainContext + ?Sized>(&mut self, ctx: &C, offset: isize) {
        let radius = ctx.settings().close_distance_km();
        self.current_index = self.location_index_from_offset(offset, radius);
        tracing::debug!("Selected location index {}", self.current_index);
        self.set_location(ctx, offset != 0, ResourceSource::Foreground).await;
    }

    /// Index reached by moving `offset` pages, skipping resident places that
    /// duplicate the current position.
    pub fn location_index_from_offset(&self, offset: isize, radius_km: f64) -> usize {
        if offset == 0 || self.locations.is_empty() {
            return self.current_index;
        }

        let len = self.locations.len() as isize;
        let step = if offset > 0 { 1 } else { -1 };
        let start = self.current_index as isize;
        let mut index = (start + offset.rem_euclid(len)).rem_euclid(len) as usize;
        while self.is_collapsed(index, radius_km) {
            index = (index as isize + step).rem_euclid(len) as usize;
        }
        index
    }

    pub fn location_from_offset(&self, offset: isize, radius_km: f64) -> Option<&Location> {
        self.locations.get(self.location_index_from_offset(offset, radius_km))
    }

    /// A resident place close to the live-GPS entry; it shares that entry's page.
    fn is_collapsed(&self, index: usize, radius_km: f64) -> bool {
        let Some(cp) = self.current_position_index else {
            return false;
        };
        if cp == index {
            return false;
        }
        let location = &self.locations[index];
        location.resident_position && location.is_close_to(&self.locations[cp], radius_km)
    }

    async fn set_location<C: MainContext + ?Sized>(
        &mut self,
        ctx: &C,
        reset_indicator: bool,
        source: ResourceSource,
    ) {
        let current = self.locations[self.current_index].clone();

        if reset_indicator {
            self.reset_indicator(ctx.settings().close_distance_km());
        }

        let polling_interval_hours = ctx.settings().polling_interval_hours();
        let fresh = current.is_usable()
            && current
                .weather
                .as_ref()
                .is_some_and(|w| w.is_valid(polling_interval_hours));

        if fresh {
            self.cancel_fetch();
            self.current_location.set(LocationResource::success(current, source));
        } else {
            tracing::debug!("Weather of {} is missing or stale", current.formatted_id());
            self.current_location.set(LocationResource::loading(current));
            self.update_weather(ctx).await;
        }
    }

    fn reset_indicator(&mut self, radius_km: f64) {
        let mut index: usize = 0;
        let mut total: usize = 0;
        for i in 0..self.locations.len() {
            if i == self.current_index {
                index = total;
            }
            if !self.is_collapsed(i, radius_km) {
                total += 1;
            }
        }
        // A collapsed selection at the end of the list shares the last page.
        let index = index.min(total.saturating_sub(1));
        self.indicator.set(Indicator { total, index });
    }

    /// Apply a background job's result for `formatted_id`. Unknown or deleted
    /// entries are ignored.
    pub async fn update_from_background<C: MainContext + ?Sized>(
        &mut self,
        ctx: &C,
        formatted_id: Option<&str>,
    ) {
        let Some(index) = self.index_of(formatted_id) else {
            tracing::debug!("Background update for unknown location {:?}", formatted_id);
            return;
        };

        let store = ctx.store();
        let Some(mut location) = store.read_location(&self.locations[index]) else {
            tracing::debug!("Background-updated location {:?} no longer stored", formatted_id);
            return;
        };
        location.weather = store.read_weather(&location);

        let is_current_position = location.current_position;
        self.locations[index] = location;

        if index == self.current_index {
            if ctx.feedback().is_ui_visible() {
                ctx.feedback().show_transient_message(UPDATED_IN_BACKGROUND_MESSAGE);
            }
            self.set_location(ctx, is_current_position, ResourceSource::Background).await;
        }
    }

    fn index_of(&self, formatted_id: Option<&str>) -> Option<usize> {
        let formatted_id = formatted_id.filter(|id| !id.is_empty())?;
        self.locations.iter().position(|l| l.matches_id(formatted_id))
    }

    /// Refresh the displayed location, asking for location permissions first
    /// when it is the live-GPS entry.
    pub async fn update_weather<C: MainContext + ?Sized>(&mut self, ctx: &C) {
        self.cancel_fetch();

        let Some(location) = self.displayed_location() else {
            tracing::warn!("Weather refresh requested before any location was loaded");
            return;
        };

        self.current_location.set(LocationResource::loading(location.clone()));

        let permissions = ctx.permissions();
        if location.current_position && permissions.requires_runtime_grant() {
            let required = self
                .repository
                .get_or_insert_with(|| ctx.create_repository())
                .required_location_permissions();
            let missing = permissions.missing_permissions(required);

            if !missing.is_empty() {
                tracing::debug!("Requesting {} location permissions", missing.len());
                let grants = permissions.request_permissions(&missing).await;
                let outcome = PermissionOutcome::classify(&grants);
                if let Some(err) = outcome.into_error() {
                    tracing::warn!("{} (usable stored position: {})", err, location.is_usable());
                }

                match (outcome, location.is_usable()) {
                    (PermissionOutcome::DeniedPivotal, true) => {
                        self.start_fetch(ctx, location, false);
                    }
                    (PermissionOutcome::DeniedPivotal, false) => {
                        self.current_location
                            .set(LocationResource::error(location, ResourceSource::Background));
                    }
                    _ => self.start_fetch(ctx, location, true),
                }
                return;
            }
        }

        let gps_backed = location.current_position;
        self.start_fetch(ctx, location, gps_backed);
    }

    fn start_fetch<C: MainContext + ?Sized>(
        &mut self,
        ctx: &C,
        location: Location,
        gps_backed: bool,
    ) {
        self.next_request_id += 1;
        let id = self.next_request_id;
        self.pending_request = Some(id);

        tracing::debug!(
            "Fetching weather for {} (request {}, gps: {})",
            location.formatted_id(),
            id,
            gps_backed
        );

        let request = FetchRequest {
            id,
            location,
            locations: self.locations.clone(),
            gps_backed,
        };
        self.repository
            .get_or_insert_with(|| ctx.create_repository())
            .get_weather(request, &self.events_tx);
    }

    fn cancel_fetch(&mut self) {
        if let Some(id) = self.pending_request.take() {
            tracing::debug!("Cancelling weather request {}", id);
        }
        if let Some(repository) = self.repository.as_mut() {
            repository.cancel();
        }
    }

    /// Drain fetch completions. Completions of superseded requests are
    /// dropped. Returns the number of completions applied.
    pub fn process_fetch_events<C: MainContext + ?Sized>(&mut self, ctx: &C) -> usize {
        let mut applied = 0;
        while let Ok(event) = self.events_rx.try_recv() {
            match event {
                FetchEvent::Completed { request_id, result } => {
                    if self.pending_request != Some(request_id) {
                        tracing::debug!("Dropping result of superseded request {}", request_id);
                        continue;
                    }
                    self.pending_request = None;

                    match result {
                        Ok(location) => self.apply_fetched(location),
                        Err(e) => {
                            let app_err = AppError::from(e);
                            tracing::warn!(
                                "Weather refresh failed: {} ({})",
                                app_err,
                                app_err.user_message()
                            );
                            if let Some(displayed) = self.displayed_location() {
                                self.current_location.set(LocationResource::error(
                                    displayed,
                                    ResourceSource::Foreground,
                                ));
                            }
                        }
                    }

                    self.on_location_completed(ctx);
                    applied += 1;
                }
            }
        }
        applied
    }

    fn apply_fetched(&mut self, location: Location) {
        let formatted_id = location.formatted_id();
        let index = self
            .locations
            .iter()
            .position(|l| l.matches_id(&formatted_id))
            .or(if location.current_position {
                self.current_position_index
            } else {
                None
            });

        let Some(index) = index else {
            tracing::debug!("Fetched location {} is no longer listed", formatted_id);
            return;
        };

        self.locations[index] = location;
        self.current_position_index = self.locations.iter().position(|l| l.current_position);

        if index == self.current_index {
            self.current_location.set(LocationResource::success(
                self.locations[index].clone(),
                ResourceSource::Foreground,
            ));
        }
    }

    /// Completion callback of the fetch collaborator: list structure may have
    /// changed (e.g. the GPS entry got resolved), so the indicator is rebuilt.
    pub fn on_location_completed<C: MainContext + ?Sized>(&mut self, ctx: &C) {
        self.reset_indicator(ctx.settings().close_distance_km());
    }

    fn displayed_location(&self) -> Option<Location> {
        self.locations
            .get(self.current_index)
            .cloned()
            .or_else(|| self.current_location_value())
    }

    pub fn current_location(&self) -> &Observable<LocationResource> {
        &self.current_location
    }

    pub fn indicator(&self) -> &Observable<Indicator> {
        &self.indicator
    }

    pub fn current_location_value(&self) -> Option<Location> {
        self.current_location.get().map(|r| r.location)
    }

    pub fn indicator_total(&self) -> usize {
        self.indicator.get().map(|i| i.total).unwrap_or(1)
    }

    pub fn indicator_index(&self) -> usize {
        self.indicator.get().map(|i| i.index).unwrap_or(0)
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn current_index(&self) -> usize {
        self.current_index
    }

    pub fn current_position_index(&self) -> Option<usize> {
        self.current_position_index
    }

    /// Cancel any in-flight fetch.
    pub fn shutdown(&mut self) {
        self.cancel_fetch();
    }
}

impl Drop for MainModel {
    fn drop(&mut self) {
        self.shutdown();
    }
}
