pub mod leads;
pub mod messages;

pub use leads::LeadsRepo;
pub use messages::MessagesRepo;
