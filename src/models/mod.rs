pub mod event;
pub mod ticket;
pub mod user;

pub use event::{Event, EventInput, EventListQuery, EventSummary};
pub use ticket::{Participant, Ticket, TicketStatus};
pub use user::{RegisterUser, Role, UpdateUserRole, User, UserListQuery};
