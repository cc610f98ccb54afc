//! Portal form bridge: slot submission and booking clicks.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, error, info, warn};

use crate::client::PortalClient;
use crate::config::BridgeOptions;
use crate::error::BridgeError;
use crate::models::slot::{BookingRequest, PortalResponse, SlotCreationRequest};
use crate::view::{ClickEvent, ControlId, PageHandles, PortalView, SlotField, SlotForm, SubmitEvent};

/// What a handler invocation did with the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HandlerOutcome {
    /// No handler is attached to the event's element.
    Unwired,
    /// Portal reported success and the page was reloaded.
    Reloaded,
    /// Portal reported a logical failure; the page was left as-is.
    Retained,
    /// The same control already has a request pending.
    Pending,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Interaction {
    SlotForm,
    Booking(ControlId),
}

pub struct PortalBridge {
    client: PortalClient,
    view: Arc<dyn PortalView>,
    slot_form: Option<Arc<dyn SlotForm>>,
    bound_controls: HashSet<ControlId>,
    options: BridgeOptions,
    in_flight: Mutex<HashSet<Interaction>>,
}

impl PortalBridge {
    /// Wire the bridge to a mounted page. Call once, after the view is ready.
    pub fn mount(client: PortalClient, page: PageHandles, options: BridgeOptions) -> Self {
        let PageHandles {
            view,
            slot_form,
            booking_controls,
        } = page;

        if slot_form.is_some() {
            info!("Slot form found - submissions will be sent to the portal");
        } else {
            debug!("No slot form on this page");
        }

        let bound_controls: HashSet<ControlId> =
            booking_controls.iter().map(|control| control.id).collect();

        if options.delegate_booking_clicks {
            info!("Booking clicks delegated - controls added later are handled too");
        } else {
            info!("Wired {} booking controls", bound_controls.len());
        }

        Self {
            client,
            view,
            slot_form,
            bound_controls,
            options,
            in_flight: Mutex::new(HashSet::new()),
        }
    }

    pub fn has_slot_form(&self) -> bool {
        self.slot_form.is_some()
    }

    pub fn is_wired(&self, control: ControlId) -> bool {
        self.options.delegate_booking_clicks || self.bound_controls.contains(&control)
    }

    /// Handle a submission of the slot form.
    pub async fn on_slot_submit(
        &self,
        event: &mut SubmitEvent,
    ) -> Result<HandlerOutcome, BridgeError> {
        let Some(form) = &self.slot_form else {
            return Ok(HandlerOutcome::Unwired);
        };

        event.prevent_default();

        let Some(_pending) = self.begin(Interaction::SlotForm) else {
            debug!("Slot submission ignored - previous one still pending");
            return Ok(HandlerOutcome::Pending);
        };

        let request = read_slot_form(form.as_ref());
        debug!(
            "Slot form values: start={:?} end={:?} location={:?}",
            request.start_time, request.end_time, request.location
        );

        let result = self.client.add_slot(&request).await;
        self.settle(result)
    }

    /// Handle a click on a booking control.
    pub async fn on_book_click(&self, event: &ClickEvent) -> Result<HandlerOutcome, BridgeError> {
        if !self.is_wired(event.current_target) {
            debug!("Click on unwired {} ignored", event.current_target);
            return Ok(HandlerOutcome::Unwired);
        }

        let Some(slot_id) = event.target_slot_id.clone() else {
            warn!(
                "Click on {} landed on an element without a slot id",
                event.current_target
            );
            return self.settle(Err(BridgeError::MissingSlotId));
        };

        let Some(_pending) = self.begin(Interaction::Booking(event.current_target)) else {
            debug!("Booking of slot {} ignored - request pending", slot_id);
            return Ok(HandlerOutcome::Pending);
        };

        let result = self.client.book_slot(&BookingRequest::new(slot_id)).await;
        self.settle(result)
    }

    fn settle(
        &self,
        result: Result<PortalResponse, BridgeError>,
    ) -> Result<HandlerOutcome, BridgeError> {
        match result {
            Ok(response) => {
                self.view.alert(response.message());
                if response.is_success() {
                    info!("Portal reported success - reloading page");
                    self.view.reload();
                    Ok(HandlerOutcome::Reloaded)
                } else {
                    info!(
                        "Portal reported status {:?}: {}",
                        response.status,
                        response.message()
                    );
                    Ok(HandlerOutcome::Retained)
                }
            }
            Err(err) => {
                error!("Portal interaction failed: {}", err);
                if err.is_silent_to_user() {
                    if let Some(notice) = &self.options.failure_notice {
                        self.view.alert(notice);
                    }
                }
                Err(err)
            }
        }
    }

    fn begin(&self, interaction: Interaction) -> Option<PendingGuard<'_>> {
        if !self.options.in_flight_guard {
            return Some(PendingGuard {
                bridge: self,
                interaction: None,
            });
        }

        if !self.lock_in_flight().insert(interaction) {
            return None;
        }

        Some(PendingGuard {
            bridge: self,
            interaction: Some(interaction),
        })
    }

    fn lock_in_flight(&self) -> MutexGuard<'_, HashSet<Interaction>> {
        // The set holds plain keys, so a poisoned lock still has usable data.
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Clears the pending mark when the interaction settles or is dropped.
struct PendingGuard<'a> {
    bridge: &'a PortalBridge,
    interaction: Option<Interaction>,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        if let Some(interaction) = self.interaction.take() {
            self.bridge.lock_in_flight().remove(&interaction);
        }
    }
}

fn read_slot_form(form: &dyn SlotForm) -> SlotCreationRequest {
    SlotCreationRequest {
        start_time: form.field_value(SlotField::StartTime),
        end_time: form.field_value(SlotField::EndTime),
        location: form.field_value(SlotField::Location),
        notes: form.field_value(SlotField::Notes),
    }
}
