//! The browser environment, made explicit.
//!
//! Page navigation, the form lookup and the cookie string are passed in as
//! trait objects rather than read from globals, so every helper can run
//! against a fake page in tests.

use std::rc::Rc;
use std::sync::Arc;

use crate::form_data::FormData;

/// The parts of `window` the helpers act on.
pub trait Window {
    /// Show a blocking message to the user.
    fn alert(&self, message: &str);
    /// Point the page at a new location.
    fn navigate(&self, url: &str);
    /// Reload the current page.
    fn reload(&self);
}

/// Form lookup by element id.
pub trait Document {
    fn has_form(&self, form_id: &str) -> bool;
    /// Current field values of the form, `None` if it no longer exists.
    fn form_data(&self, form_id: &str) -> Option<FormData>;
}

/// Access to the raw `document.cookie` string.
pub trait CookieStore {
    fn cookie_string(&self) -> String;
}

impl CookieStore for str {
    fn cookie_string(&self) -> String {
        self.to_string()
    }
}

impl CookieStore for String {
    fn cookie_string(&self) -> String {
        self.clone()
    }
}

impl<T: Window + ?Sized> Window for &T {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }

    fn reload(&self) {
        (**self).reload()
    }
}

impl<T: Document + ?Sized> Document for &T {
    fn has_form(&self, form_id: &str) -> bool {
        (**self).has_form(form_id)
    }

    fn form_data(&self, form_id: &str) -> Option<FormData> {
        (**self).form_data(form_id)
    }
}

impl<T: CookieStore + ?Sized> CookieStore for &T {
    fn cookie_string(&self) -> String {
        (**self).cookie_string()
    }
}

impl<T: Window + ?Sized> Window for Rc<T> {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }

    fn reload(&self) {
        (**self).reload()
    }
}

impl<T: Document + ?Sized> Document for Rc<T> {
    fn has_form(&self, form_id: &str) -> bool {
        (**self).has_form(form_id)
    }

    fn form_data(&self, form_id: &str) -> Option<FormData> {
        (**self).form_data(form_id)
    }
}

impl<T: CookieStore + ?Sized> CookieStore for Rc<T> {
    fn cookie_string(&self) -> String {
        (**self).cookie_string()
    }
}

impl<T: Window + ?Sized> Window for Arc<T> {
    fn alert(&self, message: &str) {
        (**self).alert(message)
    }

    fn navigate(&self, url: &str) {
        (**self).navigate(url)
    }

    fn reload(&self) {
        (**self).reload()
    }
}

impl<T: Document + ?Sized> Document for Arc<T> {
    fn has_form(&self, form_id: &str) -> bool {
        (**self).has_form(form_id)
    }

    fn form_data(&self, form_id: &str) -> Option<FormData> {
        (**self).form_data(form_id)
    }
}

impl<T: CookieStore + ?Sized> CookieStore for Arc<T> {
    fn cookie_string(&self) -> String {
        (**self).cookie_string()
    }
}
