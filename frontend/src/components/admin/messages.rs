use common::error::SessionError;
use common::model::submission::{StatusFilter, Submission, SubmissionStatus};

pub enum Msg {
    EmailChanged(String),
    PasswordChanged(String),
    Login,
    LoginFinished(Result<String, String>),
    Logout,

    Refresh,
    Loaded(Result<Vec<Submission>, SessionError>),
    SelectTab(StatusFilter),

    OpenReview(i64),
    CloseReview,
    CommentChanged(String),
    SetStatus(SubmissionStatus),
    StatusUpdated(Result<(), SessionError>),

    DownloadPdf,
    PdfFetched { file_name: String, result: Result<Vec<u8>, String> },
}
