pub mod auth_service;
pub mod friend_service;
pub mod invitation_service;
pub mod letter_service;
pub mod note_service;
pub mod user_service;

pub use auth_service::{AuthService, AuthSession};
pub use friend_service::FriendService;
pub use invitation_service::InvitationService;
pub use letter_service::LetterService;
pub use note_service::NoteService;
pub use user_service::UserService;
