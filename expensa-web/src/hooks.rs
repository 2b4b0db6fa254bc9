use client::{Interest, SessionStore};
use yew::{hook, use_context, use_effect_with, use_state};

/// The session store provided by [`crate::app::App`].
#[hook]
pub fn use_session_store() -> SessionStore {
    match use_context::<SessionStore>() {
        Some(store) => store,
        None => panic!("use_session_store called outside the session provider"),
    }
}

/// An [`Interest`] that is cancelled when the calling component unmounts.
#[hook]
pub fn use_interest() -> Interest {
    let interest = use_state(Interest::new);
    {
        let interest = (*interest).clone();
        use_effect_with((), move |_| move || interest.cancel());
    }
    (*interest).clone()
}
