use crate::engine::term::{InstanceId, Side, SourceTermId};

/// The four drop targets a card can be released over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DropZone {
    ShelfLeft,
    ShelfRight,
    SolvingLeft,
    SolvingRight,
}

impl DropZone {
    pub const ALL: [DropZone; 4] = [
        DropZone::ShelfLeft,
        DropZone::ShelfRight,
        DropZone::SolvingLeft,
        DropZone::SolvingRight,
    ];

    pub fn id(self) -> &'static str {
        match self {
            DropZone::ShelfLeft => "drop-pool-left",
            DropZone::ShelfRight => "drop-pool-right",
            DropZone::SolvingLeft => "drop-left",
            DropZone::SolvingRight => "drop-right",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|zone| zone.id() == id)
    }

    pub fn solving(side: Side) -> Self {
        match side {
            Side::Left => DropZone::SolvingLeft,
            Side::Right => DropZone::SolvingRight,
        }
    }

    pub fn shelf(side: Side) -> Self {
        match side {
            Side::Left => DropZone::ShelfLeft,
            Side::Right => DropZone::ShelfRight,
        }
    }

    pub fn side(self) -> Side {
        match self {
            DropZone::ShelfLeft | DropZone::SolvingLeft => Side::Left,
            DropZone::ShelfRight | DropZone::SolvingRight => Side::Right,
        }
    }

    /// The solving column side, or `None` for a shelf.
    pub fn solving_side(self) -> Option<Side> {
        match self {
            DropZone::SolvingLeft => Some(Side::Left),
            DropZone::SolvingRight => Some(Side::Right),
            DropZone::ShelfLeft | DropZone::ShelfRight => None,
        }
    }

    pub fn is_shelf(self) -> bool {
        self.solving_side().is_none()
    }
}

/// What is being dragged. Source and placed ids live in separate spaces.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragPayload {
    Source(SourceTermId),
    Placed(InstanceId),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DragEvent {
    Started(DragPayload),
    Ended {
        payload: Option<DragPayload>,
        target: Option<DropZone>,
    },
    Cancelled,
}

impl DragEvent {
    /// Build an end event from the raw zone id reported by the gesture layer.
    pub fn ended(payload: Option<DragPayload>, target_id: Option<&str>) -> Self {
        DragEvent::Ended {
            payload,
            target: target_id.and_then(DropZone::from_id),
        }
    }
}

/// Ledger operation implied by a finished drag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DropAction {
    Place { source: SourceTermId, side: Side },
    Move { instance: InstanceId, side: Side },
    Remove(InstanceId),
    Ignore,
}

pub fn resolve_drop(payload: DragPayload, target: Option<DropZone>) -> DropAction {
    let Some(target) = target else {
        return DropAction::Ignore;
    };
    match (payload, target.solving_side()) {
        (DragPayload::Source(source), Some(side)) => DropAction::Place { source, side },
        (DragPayload::Source(_), None) => DropAction::Ignore,
        (DragPayload::Placed(instance), Some(side)) => DropAction::Move { instance, side },
        (DragPayload::Placed(instance), None) => DropAction::Remove(instance),
    }
}
