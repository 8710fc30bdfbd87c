pub mod controller;
pub mod domain;
pub mod export;
pub mod note_store;
pub mod ports;
pub mod share;
pub mod time;
pub mod url;

pub use controller::{Dialog, Toast, ToastKind, UiState, ViewController};
pub use domain::{
    AvailableNotes, InvalidPin, NewSharedRecord, Note, Pin, SessionMode, ShareToken, SharedRecord,
};
pub use export::{ExportError, ExportFormat};
pub use note_store::{AccessMode, Direction, NoteStore};
pub use ports::{Clipboard, PortError, PortResult, SharedNotesRepository, VideoPlayer};
pub use share::{ShareError, ShareGateway, ShareResult};
