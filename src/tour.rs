use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::TourError;

/// Anchor of the link pointing back to the previous scene.
pub const BACKWARD_ANCHOR: Position = Position {
    texture_x: 1200,
    texture_y: 1800,
};

/// Anchor of the link pointing on to the next scene.
pub const FORWARD_ANCHOR: Position = Position {
    texture_x: 300,
    texture_y: 1800,
};

/// A panorama scene in a tour.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    pub id: String,
    pub panorama: String,
    pub name: String,
    pub links: Vec<Link>,
}

/// Directed edge from a scene to an adjacent scene.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Link {
    pub node_id: String,
    pub position: Position,
}

/// Texture coordinates of a link hotspot in the panorama.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub texture_x: u32,
    pub texture_y: u32,
}

impl Link {
    fn backward(index: usize) -> Self {
        Self {
            node_id: index.to_string(),
            position: BACKWARD_ANCHOR,
        }
    }

    fn forward(index: usize) -> Self {
        Self {
            node_id: (index + 2).to_string(),
            position: FORWARD_ANCHOR,
        }
    }
}

/// Build a linear tour from panorama references in upload order.
///
/// Node `i` (1-based) links back to `i-1` and on to `i+1` where those exist,
/// backward link first.
pub fn build_tour<S: AsRef<str>>(panoramas: &[S]) -> Vec<Node> {
    let count = panoramas.len();
    panoramas
        .iter()
        .enumerate()
        .map(|(i, panorama)| {
            let mut links = Vec::with_capacity(2);
            if i > 0 {
                links.push(Link::backward(i));
            }
            if i + 1 < count {
                links.push(Link::forward(i));
            }
            Node {
                id: (i + 1).to_string(),
                panorama: panorama.as_ref().to_string(),
                name: format!("Scene {}", i + 1),
                links,
            }
        })
        .collect()
}

/// Check that a node sequence has exactly the shape `build_tour` produces.
pub fn validate_tour(nodes: &[Node]) -> Result<(), TourError> {
    if nodes.is_empty() {
        return Err(TourError::InvalidTour("tour has no nodes".to_string()));
    }

    let count = nodes.len();
    for (i, node) in nodes.iter().enumerate() {
        let expected_id = (i + 1).to_string();
        if node.id != expected_id {
            return Err(TourError::InvalidTour(format!(
                "node at position {} has id '{}', expected '{}'",
                i + 1,
                node.id,
                expected_id
            )));
        }

        let mut expected_links = Vec::with_capacity(2);
        if i > 0 {
            expected_links.push(Link::backward(i));
        }
        if i + 1 < count {
            expected_links.push(Link::forward(i));
        }
        if node.links != expected_links {
            return Err(TourError::InvalidTour(format!(
                "node '{}' has unexpected links",
                node.id
            )));
        }
    }

    Ok(())
}
