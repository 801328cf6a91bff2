pub mod delete;
pub mod list;
pub mod publish;
pub mod today;
pub mod update;

pub use delete::drop_delete;
pub use list::drop_list;
pub use publish::drop_publish;
pub use today::drop_today;
pub use update::drop_update;
