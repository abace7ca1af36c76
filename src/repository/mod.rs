#[cfg(feature = "async")]
mod async_repository;
mod repository;
mod untracked;

#[cfg(feature = "async")]
pub use async_repository::{AsyncRepository, AsyncRepositoryExt};
pub use repository::{Repository, RepositoryExt};
pub use untracked::UntrackedRepository;
