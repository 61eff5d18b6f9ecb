/// Failures of the navigation core.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerError {
    #[error("the playlist is empty")]
    EmptyPlaylist,

    #[error("album {index} has no tracks")]
    EmptyAlbum { index: usize },

    #[error("album index {index} is out of range for {len} albums")]
    AlbumOutOfRange { index: usize, len: usize },

    #[error("track index {index} is out of range for {len} tracks")]
    TrackOutOfRange { index: usize, len: usize },
}
