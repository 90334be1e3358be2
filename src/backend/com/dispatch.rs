//! Late-bound `IDispatch` helpers and RAII guards for Office automation.
//!
//! Office exposes its object model only through `IDispatch`, so every call is
//! a name lookup (`GetIDsOfNames`) followed by `Invoke`. The guards here tie
//! each acquired resource to a scope:
//!
//! ```text
//! Apartment     CoInitializeEx  … CoUninitialize
//!  └─ Application  CoCreateInstance … Quit()
//!      └─ OpenDocument  Open(…)   … Close(…)
//! ```
//!
//! Declare them in that order and Rust drops them in reverse, so a failed
//! export still closes the document and quits the server.

use crate::error::BackendError;
use std::ops::Deref;
use windows::core::{IUnknown, Interface, BSTR, GUID, HSTRING, PCWSTR, VARIANT};
use windows::Win32::System::Com::{
    CLSIDFromProgID, CoCreateInstance, CoInitializeEx, CoUninitialize, IDispatch,
    CLSCTX_LOCAL_SERVER, COINIT_APARTMENTTHREADED, DISPATCH_FLAGS, DISPATCH_METHOD,
    DISPATCH_PROPERTYGET, DISPATCH_PROPERTYPUT, DISPPARAMS, EXCEPINFO,
};
use windows::Win32::System::Ole::DISPID_PROPERTYPUT;

const LOCALE_USER_DEFAULT: u32 = 0x0400;

fn automation(call: &str, err: windows::core::Error) -> BackendError {
    BackendError::Automation {
        call: call.to_string(),
        detail: err.to_string(),
    }
}

/// `VT_BSTR` variant holding `s`.
pub(crate) fn bstr(s: &str) -> VARIANT {
    VARIANT::from(BSTR::from(s))
}

// ── Apartment ────────────────────────────────────────────────────────────────

/// Single-threaded COM apartment for the current thread.
pub(crate) struct Apartment(());

impl Apartment {
    pub(crate) fn enter() -> Result<Self, BackendError> {
        unsafe { CoInitializeEx(None, COINIT_APARTMENTTHREADED) }
            .ok()
            .map_err(|e| automation("CoInitializeEx", e))?;
        Ok(Self(()))
    }
}

impl Drop for Apartment {
    fn drop(&mut self) {
        unsafe { CoUninitialize() };
    }
}

// ── Dispatch ─────────────────────────────────────────────────────────────────

/// An automation object addressed by member name.
pub(crate) struct Dispatch {
    inner: IDispatch,
}

impl Dispatch {
    /// Start a fresh out-of-process server for `prog_id` (`Excel.Application`).
    ///
    /// `CLSCTX_LOCAL_SERVER` always spawns a new instance rather than attaching
    /// to one the user has open.
    pub(crate) fn create(prog_id: &str) -> Result<Self, BackendError> {
        let name = HSTRING::from(prog_id);
        let clsid = unsafe { CLSIDFromProgID(&name) }.map_err(|e| automation(prog_id, e))?;
        let inner: IDispatch = unsafe { CoCreateInstance(&clsid, None, CLSCTX_LOCAL_SERVER) }
            .map_err(|e| automation(prog_id, e))?;
        Ok(Self { inner })
    }

    /// Read property `name` as an object (`app.Workbooks`).
    pub(crate) fn get(&self, name: &str) -> Result<Dispatch, BackendError> {
        let value = self.invoke(name, DISPATCH_PROPERTYGET, &[])?;
        Self::from_variant(name, &value)
    }

    /// Assign property `name` (`app.DisplayAlerts = False`).
    pub(crate) fn put(&self, name: &str, value: VARIANT) -> Result<(), BackendError> {
        self.invoke(name, DISPATCH_PROPERTYPUT, &[value]).map(|_| ())
    }

    /// Call method `name` with positional `args`.
    pub(crate) fn call(&self, name: &str, args: &[VARIANT]) -> Result<VARIANT, BackendError> {
        self.invoke(name, DISPATCH_METHOD, args)
    }

    /// Call method `name` and treat the result as an object (`Workbooks.Open`).
    pub(crate) fn call_object(
        &self,
        name: &str,
        args: &[VARIANT],
    ) -> Result<Dispatch, BackendError> {
        let value = self.call(name, args)?;
        Self::from_variant(name, &value)
    }

    fn from_variant(name: &str, value: &VARIANT) -> Result<Dispatch, BackendError> {
        let unknown = IUnknown::try_from(value).map_err(|e| automation(name, e))?;
        let inner = unknown.cast::<IDispatch>().map_err(|e| automation(name, e))?;
        Ok(Dispatch { inner })
    }

    fn dispid(&self, name: &str) -> Result<i32, BackendError> {
        let wide = HSTRING::from(name);
        let names = [PCWSTR(wide.as_ptr())];
        let mut id = 0i32;
        unsafe {
            self.inner
                .GetIDsOfNames(&GUID::zeroed(), names.as_ptr(), 1, LOCALE_USER_DEFAULT, &mut id)
        }
        .map_err(|e| automation(name, e))?;
        Ok(id)
    }

    fn invoke(
        &self,
        name: &str,
        flags: DISPATCH_FLAGS,
        args: &[VARIANT],
    ) -> Result<VARIANT, BackendError> {
        let id = self.dispid(name)?;

        // IDispatch takes positional arguments last-to-first.
        let mut args: Vec<VARIANT> = args.iter().rev().cloned().collect();
        let mut named = [DISPID_PROPERTYPUT];
        let is_put = flags == DISPATCH_PROPERTYPUT;

        let params = DISPPARAMS {
            rgvarg: if args.is_empty() {
                std::ptr::null_mut()
            } else {
                args.as_mut_ptr()
            },
            rgdispidNamedArgs: if is_put {
                named.as_mut_ptr()
            } else {
                std::ptr::null_mut()
            },
            cArgs: args.len() as u32,
            cNamedArgs: u32::from(is_put),
        };

        let mut result = VARIANT::default();
        let mut excep = EXCEPINFO::default();
        unsafe {
            self.inner.Invoke(
                id,
                &GUID::zeroed(),
                LOCALE_USER_DEFAULT,
                flags,
                &params,
                Some(&mut result as *mut VARIANT),
                Some(&mut excep as *mut EXCEPINFO),
                None,
            )
        }
        .map_err(|e| {
            let description = excep.bstrDescription.to_string();
            if description.is_empty() {
                automation(name, e)
            } else {
                BackendError::Automation {
                    call: name.to_string(),
                    detail: format!("{description} ({e})"),
                }
            }
        })?;

        Ok(result)
    }
}

// ── Scoped resources ─────────────────────────────────────────────────────────

/// An Office application instance that is quit when dropped.
pub(crate) struct Application(Dispatch);

impl Application {
    pub(crate) fn launch(prog_id: &str) -> Result<Self, BackendError> {
        Dispatch::create(prog_id).map(Self)
    }
}

impl Deref for Application {
    type Target = Dispatch;

    fn deref(&self) -> &Dispatch {
        &self.0
    }
}

impl Drop for Application {
    fn drop(&mut self) {
        let _ = self.0.call("Quit", &[]);
    }
}

/// An open document/workbook/presentation that is closed when dropped.
pub(crate) struct OpenDocument {
    doc: Dispatch,
    close_args: Vec<VARIANT>,
}

impl OpenDocument {
    /// `close_args` are passed to `Close` (e.g. "don't save changes").
    pub(crate) fn new(doc: Dispatch, close_args: Vec<VARIANT>) -> Self {
        Self { doc, close_args }
    }
}

impl Deref for OpenDocument {
    type Target = Dispatch;

    fn deref(&self) -> &Dispatch {
        &self.doc
    }
}

impl Drop for OpenDocument {
    fn drop(&mut self) {
        let _ = self.doc.call("Close", &self.close_args);
    }
}
