mod handle;
mod intent;
pub(crate) mod sys;
pub mod view;

pub use handle::FileHandle;
pub use intent::{Access, Disposition, OpenIntent, SeekMode};
pub use sys::RawHandle;
pub use view::{InStream, OutStream, Reader, Stream, Writer};
