//! Page surface the bridge talks to.
//!
//! The hosting view layer (browser glue, webview, console harness) implements
//! these traits and hands the bridge explicit references at mount time.

use std::fmt;
use std::sync::Arc;

#[cfg_attr(test, mockall::automock)]
pub trait PortalView: Send + Sync {
    /// Show a blocking message to the user.
    fn alert(&self, message: &str);

    /// Reload the current page, discarding in-memory UI state.
    fn reload(&self);
}

#[cfg_attr(test, mockall::automock)]
pub trait SlotForm: Send + Sync {
    /// Current raw value of an input, exactly as the page holds it.
    fn field_value(&self, field: SlotField) -> String;
}

/// Inputs of the slot form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotField {
    StartTime,
    EndTime,
    Location,
    Notes,
}

impl SlotField {
    pub fn element_id(&self) -> &'static str {
        match self {
            SlotField::StartTime => "start_time",
            SlotField::EndTime => "end_time",
            SlotField::Location => "location",
            SlotField::Notes => "notes",
        }
    }
}

impl fmt::Display for SlotField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element_id())
    }
}

/// Identity of a rendered booking control.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ControlId(pub u32);

impl fmt::Display for ControlId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "control#{}", self.0)
    }
}

/// A clickable element carrying the booking marker class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookingControl {
    pub id: ControlId,
    pub slot_id: Option<String>,
}

impl BookingControl {
    pub fn new(id: u32, slot_id: impl Into<String>) -> Self {
        Self {
            id: ControlId(id),
            slot_id: Some(slot_id.into()),
        }
    }
}

/// Form submission event; the default action is native navigation.
#[derive(Debug, Default)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

/// Click on a booking control.
///
/// `current_target` is the control the handler is attached to; `target_slot_id`
/// is the data attribute of the element actually clicked, which is `None`
/// when the click lands on a child element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub current_target: ControlId,
    pub target_slot_id: Option<String>,
}

impl ClickEvent {
    pub fn on(control: &BookingControl) -> Self {
        Self {
            current_target: control.id,
            target_slot_id: control.slot_id.clone(),
        }
    }

    pub fn on_child_of(control: &BookingControl) -> Self {
        Self {
            current_target: control.id,
            target_slot_id: None,
        }
    }
}

/// Everything the bridge is given once the view reports it is mounted.
pub struct PageHandles {
    pub view: Arc<dyn PortalView>,
    pub slot_form: Option<Arc<dyn SlotForm>>,
    pub booking_controls: Vec<BookingControl>,
}

impl PageHandles {
    pub fn new(view: Arc<dyn PortalView>) -> Self {
        Self {
            view,
            slot_form: None,
            booking_controls: Vec::new(),
        }
    }

    pub fn with_slot_form(mut self, form: Arc<dyn SlotForm>) -> Self {
        self.slot_form = Some(form);
        self
    }

    pub fn with_booking_controls(mut self, controls: Vec<BookingControl>) -> Self {
        self.booking_controls = controls;
        self
    }
}
