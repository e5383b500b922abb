pub mod value_objects;

pub use value_objects::{
    AlbumViewFilters, AssetSource, FetchKind, FetchRequest, MediaKind, PageResponse,
    SearchContext, SearchFilters, SortOrder,
};
