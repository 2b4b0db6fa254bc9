pub(crate) mod expense_dialog;
pub(crate) mod form;
pub(crate) mod header_nav_item;
pub(crate) mod loading;
pub(crate) mod pager;
pub(crate) mod toast;
pub(crate) mod user_dropdown;
