use common::error::SessionError;
use common::model::membership::FieldId;
use common::session::{ExportJob, PopupAction, SaveJob};
use common::signature::{Point, SignatureMode};

pub enum Msg {
    FieldChanged(FieldId, String),
    FieldBlurred(FieldId),

    PointerDown(Point),
    PointerMove(Point),
    PointerUp,
    SetSignatureMode(SignatureMode),
    SignatureFileChosen(web_sys::File),
    SignatureFileLoaded { content_type: String, bytes: Vec<u8> },
    ClearSignature,

    Generate,
    ExportFinished(ExportJob, Result<Vec<u8>, SessionError>),
    Popup(PopupAction),
    SaveFinished(SaveJob, Result<Option<String>, SessionError>, PopupAction),
    ReexportFinished(ExportJob, Result<Vec<u8>, SessionError>, PopupAction),
    ClosePopup,

    /// Clears the status line if it is still the one with this serial.
    ClearStatus(u32),
}
