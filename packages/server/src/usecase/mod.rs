//! UseCase 層
//!
//! リレーのビジネスロジックを実装するレイヤー。
//! UI 層から呼び出され、Domain 層（Registry, Validator）を操作します。

pub mod engine;
pub mod error;
pub mod join_room;
pub mod leave_room;
pub mod relay_message;

pub use engine::{EventOutcome, RelayEngine};
pub use error::{JoinError, RelayError};
pub use join_room::JoinRoomUseCase;
pub use leave_room::LeaveRoomUseCase;
pub use relay_message::{BroadcastReport, RelayMessageUseCase};
