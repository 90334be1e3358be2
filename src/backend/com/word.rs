use super::dispatch::{bstr, Apartment, Application, OpenDocument};
use crate::error::BackendError;
use windows::core::VARIANT;

/// `WdExportFormat.wdExportFormatPDF`
const WD_EXPORT_FORMAT_PDF: i32 = 17;
/// `WdSaveOptions.wdDoNotSaveChanges`
const WD_DO_NOT_SAVE_CHANGES: i32 = 0;
/// `WdAlertLevel.wdAlertsNone`
const WD_ALERTS_NONE: i32 = 0;

pub(super) fn export_pdf(source: &str, destination: &str) -> Result<(), BackendError> {
    let _apartment = Apartment::enter()?;
    let app = Application::launch("Word.Application")?;
    app.put("Visible", VARIANT::from(false))?;
    app.put("DisplayAlerts", VARIANT::from(WD_ALERTS_NONE))?;

    // Documents.Open(FileName, ConfirmConversions:=False, ReadOnly:=True)
    let doc = app.get("Documents")?.call_object(
        "Open",
        &[bstr(source), VARIANT::from(false), VARIANT::from(true)],
    )?;
    let doc = OpenDocument::new(doc, vec![VARIANT::from(WD_DO_NOT_SAVE_CHANGES)]);

    doc.call(
        "ExportAsFixedFormat",
        &[bstr(destination), VARIANT::from(WD_EXPORT_FORMAT_PDF)],
    )?;
    Ok(())
}
