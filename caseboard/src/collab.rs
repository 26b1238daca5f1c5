//! Seams to services the board consumes but does not implement: image
//! thumbnails, a text assistant and an address geocoder.
//!
//! Every wrapper here absorbs the collaborator's failure. Callers get a
//! placeholder, a single error string or a fallback node, never a
//! half-applied board mutation.

use crate::error::ResourceError;
use crate::geometry::rect::Point;
use crate::model::{FieldRecord, NodeId, NodeSpec};
use crate::Board;
use tracing::warn;

pub const MAP_PIN_ICON: &str = "📍";

/// Decoded RGBA pixels for a node image.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thumbnail {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

pub trait ThumbnailProvider {
    fn thumbnail(&self, image_ref: &str) -> Result<Thumbnail, ResourceError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ThumbnailState {
    Ready(Thumbnail),
    /// The image exists on the node but could not be loaded.
    Placeholder,
    None,
}

pub fn resolve_thumbnail(provider: &dyn ThumbnailProvider, image_ref: Option<&str>) -> ThumbnailState {
    let Some(image_ref) = image_ref.filter(|r| !r.trim().is_empty()) else {
        return ThumbnailState::None;
    };
    match provider.thumbnail(image_ref) {
        Ok(t) => ThumbnailState::Ready(t),
        Err(err) => {
            warn!(image_ref, %err, "thumbnail unavailable");
            ThumbnailState::Placeholder
        }
    }
}

pub trait Assistant {
    /// Free-text suggestions for a clue, typically one per line.
    fn suggest(&self, title: &str, description: &str, count: usize) -> Result<String, ResourceError>;
}

/// Asks the assistant for investigative leads on a node.
///
/// Bullets and list numbering are stripped, blank lines dropped and the
/// result capped at `count` entries.
pub fn suggest_leads(
    assistant: &dyn Assistant,
    board: &Board,
    node: NodeId,
    count: usize,
) -> Result<Vec<String>, String> {
    let n = board.node(node).ok_or_else(|| format!("unknown node {node}"))?;
    if count == 0 {
        return Ok(Vec::new());
    }
    let text = assistant.suggest(&n.title, &n.description, count).map_err(|err| {
        warn!(node, %err, "assistant request failed");
        err.to_string()
    })?;
    Ok(text
        .lines()
        .map(strip_list_marker)
        .filter(|l| !l.is_empty())
        .take(count)
        .map(str::to_string)
        .collect())
}

fn strip_list_marker(line: &str) -> &str {
    let line = line.trim();
    let line = line.trim_start_matches(['-', '*', '•']).trim_start();
    let digits = line.chars().take_while(char::is_ascii_digit).count();
    if digits > 0 {
        let rest = &line[digits..];
        if let Some(rest) = rest.strip_prefix('.').or_else(|| rest.strip_prefix(')')) {
            return rest.trim_start();
        }
    }
    line
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

pub trait AddressResolver {
    /// `Ok(None)` when the query matched nothing.
    fn resolve(&self, query: &str) -> Result<Option<GeoPoint>, ResourceError>;
}

/// Creation parameters for a map pin at `at`. A failed or empty lookup
/// still yields a pin, with the address as its description.
pub fn map_pin_spec(resolver: &dyn AddressResolver, address: &str, at: Point) -> NodeSpec {
    let address = address.trim();
    let spec = NodeSpec::new(address).at(at.x, at.y).icon(MAP_PIN_ICON);
    match resolver.resolve(address) {
        Ok(Some(GeoPoint { lat, lon })) => spec
            .description(format!("{lat:.4}, {lon:.4}"))
            .field("Latitude", FieldRecord::new(lat.to_string()))
            .field("Longitude", FieldRecord::new(lon.to_string())),
        Ok(None) => spec.description(address),
        Err(err) => {
            warn!(address, %err, "address lookup failed");
            spec.description(address)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Canned(Result<String, ResourceError>);

    impl Assistant for Canned {
        fn suggest(&self, _: &str, _: &str, _: usize) -> Result<String, ResourceError> {
            self.0.clone()
        }
    }

    struct Fixed(Result<Option<GeoPoint>, ResourceError>);

    impl AddressResolver for Fixed {
        fn resolve(&self, _: &str) -> Result<Option<GeoPoint>, ResourceError> {
            self.0.clone()
        }
    }

    struct Broken;

    impl ThumbnailProvider for Broken {
        fn thumbnail(&self, _: &str) -> Result<Thumbnail, ResourceError> {
            Err(ResourceError::NotFound)
        }
    }

    #[test]
    fn leads_are_cleaned_and_capped() {
        let mut b = Board::new();
        let n = b.create_node(NodeSpec::new("Van")).unwrap();
        let ai = Canned(Ok("1. Check plates\n\n- Ask the garage\n• Pull toll records\n2) extra".into()));
        let leads = suggest_leads(&ai, &b, n, 3).unwrap();
        assert_eq!(leads, ["Check plates", "Ask the garage", "Pull toll records"]);
    }

    #[test]
    fn assistant_failure_is_one_string() {
        let mut b = Board::new();
        let n = b.create_node(NodeSpec::new("Van")).unwrap();
        let ai = Canned(Err(ResourceError::Unavailable("timeout".into())));
        assert_eq!(suggest_leads(&ai, &b, n, 3), Err("resource unavailable: timeout".to_string()));
    }

    #[test]
    fn resolved_pin_carries_coordinates() {
        let geo = Fixed(Ok(Some(GeoPoint { lat: 48.858_37, lon: 2.294_481 })));
        let spec = map_pin_spec(&geo, " Eiffel Tower ", Point::new(5.0, 6.0));
        assert_eq!(spec.title, "Eiffel Tower");
        assert_eq!(spec.description, "48.8584, 2.2945");
        assert_eq!(spec.icon.as_deref(), Some(MAP_PIN_ICON));
        assert_eq!(spec.fields["Latitude"].value, "48.85837");
        assert_eq!((spec.x, spec.y), (5.0, 6.0));
    }

    #[test]
    fn failed_lookup_still_makes_a_pin() {
        let geo = Fixed(Err(ResourceError::Unavailable("offline".into())));
        let spec = map_pin_spec(&geo, "Harbour", Point::default());
        assert_eq!(spec.description, "Harbour");
        assert!(spec.fields.is_empty());
    }

    #[test]
    fn thumbnails_degrade_to_placeholder() {
        assert_eq!(resolve_thumbnail(&Broken, Some("a.png")), ThumbnailState::Placeholder);
        assert_eq!(resolve_thumbnail(&Broken, Some("  ")), ThumbnailState::None);
        assert_eq!(resolve_thumbnail(&Broken, None), ThumbnailState::None);
    }
}
