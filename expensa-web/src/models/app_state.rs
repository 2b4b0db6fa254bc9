use client::{ApiError, Session};
use gloo_timers::callback::Timeout;
use yewdux::{Dispatch, Store};

use crate::console;

const TOAST_MILLIS: u32 = 4_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Info,
    Error,
}

impl ToastKind {
    pub fn alert_class(self) -> &'static str {
        match self {
            Self::Success => "alert-success",
            Self::Info => "alert-info",
            Self::Error => "alert-error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub id: u32,
    pub kind: ToastKind,
    pub message: String,
}

/// Render-side mirror of the session plus transient UI state.
#[derive(Debug, Default, Clone, PartialEq, Store)]
pub struct AppState {
    /// Set once the persisted session has been restored and checked.
    pub ready: bool,
    pub session: Session,
    pub unread: u64,
    pub toast: Option<Toast>,
    next_toast: u32,
}

/// Shows `message` until the next toast replaces it or it times out.
pub fn show_toast(dispatch: &Dispatch<AppState>, kind: ToastKind, message: impl Into<String>) {
    let id = dispatch.get().next_toast;
    let message = message.into();
    dispatch.reduce_mut(move |state| {
        state.next_toast = id.wrapping_add(1);
        state.toast = Some(Toast { id, kind, message });
    });

    let dispatch = dispatch.clone();
    Timeout::new(TOAST_MILLIS, move || {
        dispatch.reduce_mut(|state| {
            if state.toast.as_ref().is_some_and(|toast| toast.id == id) {
                state.toast = None;
            }
        });
    })
    .forget();
}

/// Reports a failed call. Rejected credentials are left to the session,
/// which signs out and says so itself.
pub fn report_error(dispatch: &Dispatch<AppState>, action: &str, err: &ApiError) {
    console::warn(&format!("{action} failed: {err}"));
    if err.is_auth_failure() {
        return;
    }
    show_toast(dispatch, ToastKind::Error, err.user_message());
}
