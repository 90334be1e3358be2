use super::dispatch::{bstr, Apartment, Application, OpenDocument};
use crate::error::BackendError;
use windows::core::VARIANT;

/// `PpSaveAsFileType.ppSaveAsPDF`
const PP_SAVE_AS_PDF: i32 = 32;
/// `MsoTriState.msoTrue` / `msoFalse`
const MSO_TRUE: i32 = -1;
const MSO_FALSE: i32 = 0;
/// `PpAlertLevel.ppAlertsNone`
const PP_ALERTS_NONE: i32 = 1;

// PowerPoint refuses `Visible = False` on the application; hiding is done
// per presentation through `WithWindow`.
pub(super) fn export_pdf(source: &str, destination: &str) -> Result<(), BackendError> {
    let _apartment = Apartment::enter()?;
    let app = Application::launch("PowerPoint.Application")?;
    app.put("DisplayAlerts", VARIANT::from(PP_ALERTS_NONE))?;

    // Presentations.Open(FileName, ReadOnly, Untitled, WithWindow)
    let deck = app.get("Presentations")?.call_object(
        "Open",
        &[
            bstr(source),
            VARIANT::from(MSO_TRUE),
            VARIANT::from(MSO_FALSE),
            VARIANT::from(MSO_FALSE),
        ],
    )?;
    let deck = OpenDocument::new(deck, Vec::new());

    deck.call(
        "SaveAs",
        &[bstr(destination), VARIANT::from(PP_SAVE_AS_PDF)],
    )?;
    Ok(())
}
