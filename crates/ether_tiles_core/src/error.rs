//! Error type shared by loading and querying

use thiserror::Error;

/// Errors that can occur when loading or querying a tileset
#[derive(Debug, Error)]
pub enum TilesetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not well-formed or lacks required attributes/elements
    #[error("Malformed asset: {0}")]
    MalformedAsset(String),

    /// A property's type tag and literal value disagree, or the schema rejects it
    #[error("Schema error: property '{property}'{}: {message}", tile_suffix(.tile))]
    Schema {
        tile: Option<u32>,
        property: String,
        message: String,
    },

    /// Query for a tile id outside `[0, tile_count)`
    #[error("Tile id {id} out of range (tile count {tile_count})")]
    OutOfRange { id: u32, tile_count: u32 },
}

fn tile_suffix(tile: &Option<u32>) -> String {
    match tile {
        Some(id) => format!(" on tile {}", id),
        None => String::new(),
    }
}

impl TilesetError {
    pub fn malformed(msg: impl Into<String>) -> Self {
        TilesetError::MalformedAsset(msg.into())
    }

    pub fn schema(
        tile: Option<u32>,
        property: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        TilesetError::Schema {
            tile,
            property: property.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_message_names_tile() {
        let err = TilesetError::schema(Some(62), "health", "'x' is not an integer literal");
        assert_eq!(
            err.to_string(),
            "Schema error: property 'health' on tile 62: 'x' is not an integer literal"
        );

        let err = TilesetError::schema(None, "author", "unknown property");
        assert_eq!(err.to_string(), "Schema error: property 'author': unknown property");
    }

    #[test]
    fn test_out_of_range_message() {
        let err = TilesetError::OutOfRange {
            id: 80,
            tile_count: 80,
        };
        assert_eq!(err.to_string(), "Tile id 80 out of range (tile count 80)");
    }
}
