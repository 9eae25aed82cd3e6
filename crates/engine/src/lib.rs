pub mod verdict;
pub mod watcher;
