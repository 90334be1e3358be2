use super::dispatch::{bstr, Apartment, Application, OpenDocument};
use crate::error::BackendError;
use windows::core::VARIANT;

/// `XlFixedFormatType.xlTypePDF`
const XL_TYPE_PDF: i32 = 0;

pub(super) fn export_pdf(source: &str, destination: &str) -> Result<(), BackendError> {
    let _apartment = Apartment::enter()?;
    let app = Application::launch("Excel.Application")?;
    app.put("Visible", VARIANT::from(false))?;
    app.put("DisplayAlerts", VARIANT::from(false))?;

    // Workbooks.Open(Filename, UpdateLinks:=0, ReadOnly:=True)
    let book = app.get("Workbooks")?.call_object(
        "Open",
        &[bstr(source), VARIANT::from(0i32), VARIANT::from(true)],
    )?;
    // Close(SaveChanges:=False)
    let book = OpenDocument::new(book, vec![VARIANT::from(false)]);

    book.call(
        "ExportAsFixedFormat",
        &[VARIANT::from(XL_TYPE_PDF), bstr(destination)],
    )?;
    Ok(())
}
