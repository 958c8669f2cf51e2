use serde::{Deserialize, Serialize};

/// Anatomical joints reported by the depth sensor, in sensor enumeration order.
///
/// The declaration order is the column order used by the TRC export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum JointId {
    SpineBase,
    SpineMid,
    Neck,
    Head,
    ShoulderLeft,
    ElbowLeft,
    WristLeft,
    HandLeft,
    ShoulderRight,
    ElbowRight,
    WristRight,
    HandRight,
    HipLeft,
    KneeLeft,
    AnkleLeft,
    FootLeft,
    HipRight,
    KneeRight,
    AnkleRight,
    FootRight,
    SpineShoulder,
    HandTipLeft,
    ThumbLeft,
    HandTipRight,
    ThumbRight,
}

impl JointId {
    pub const COUNT: usize = 25;

    /// Every joint with its export label, in column order
    pub const ALL: [(JointId, &'static str); JointId::COUNT] = [
        (JointId::SpineBase, "SpineBase"),
        (JointId::SpineMid, "SpineMid"),
        (JointId::Neck, "Neck"),
        (JointId::Head, "Head"),
        (JointId::ShoulderLeft, "ShoulderLeft"),
        (JointId::ElbowLeft, "ElbowLeft"),
        (JointId::WristLeft, "WristLeft"),
        (JointId::HandLeft, "HandLeft"),
        (JointId::ShoulderRight, "ShoulderRight"),
        (JointId::ElbowRight, "ElbowRight"),
        (JointId::WristRight, "WristRight"),
        (JointId::HandRight, "HandRight"),
        (JointId::HipLeft, "HipLeft"),
        (JointId::KneeLeft, "KneeLeft"),
        (JointId::AnkleLeft, "AnkleLeft"),
        (JointId::FootLeft, "FootLeft"),
        (JointId::HipRight, "HipRight"),
        (JointId::KneeRight, "KneeRight"),
        (JointId::AnkleRight, "AnkleRight"),
        (JointId::FootRight, "FootRight"),
        (JointId::SpineShoulder, "SpineShoulder"),
        (JointId::HandTipLeft, "HandTipLeft"),
        (JointId::ThumbLeft, "ThumbLeft"),
        (JointId::HandTipRight, "HandTipRight"),
        (JointId::ThumbRight, "ThumbRight"),
    ];

    /// Column position of this joint
    pub fn index(self) -> usize {
        self as usize
    }

    /// Export label of this joint
    pub fn label(self) -> &'static str {
        Self::ALL[self.index()].1
    }
}

/// How confident the sensor is about a joint position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TrackingConfidence {
    NotTracked,
    Inferred,
    Tracked,
}

impl TrackingConfidence {
    /// Ordinal weight, summed per limb to pick the overlay colour
    pub fn weight(self) -> u8 {
        match self {
            TrackingConfidence::NotTracked => 0,
            TrackingConfidence::Inferred => 1,
            TrackingConfidence::Tracked => 2,
        }
    }
}

/// Point in sensor camera space, in meters
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub fn scaled(self, factor: f64) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
            z: self.z * factor,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointSample {
    pub id: JointId,
    pub position: Position,
    pub confidence: TrackingConfidence,
}

impl JointSample {
    pub fn new(id: JointId, position: Position, confidence: TrackingConfidence) -> Self {
        Self {
            id,
            position,
            confidence,
        }
    }
}

/// Joint samples of one body captured at one instant, ordered by joint id
#[derive(Debug, Clone, PartialEq)]
pub struct Skeleton {
    joints: Vec<JointSample>,
}

impl Skeleton {
    pub fn new(mut joints: Vec<JointSample>) -> Self {
        joints.sort_by_key(|joint| joint.id);
        Self { joints }
    }

    pub fn joints(&self) -> &[JointSample] {
        &self.joints
    }

    pub fn joint_count(&self) -> usize {
        self.joints.len()
    }

    pub fn get(&self, id: JointId) -> Option<&JointSample> {
        self.joints.iter().find(|joint| joint.id == id)
    }

    /// Number of samples carrying `id`
    pub fn count_of(&self, id: JointId) -> usize {
        self.joints.iter().filter(|joint| joint.id == id).count()
    }
}

/// A labelled TRC column bound to the joint it is filled from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    pub joint: JointId,
    pub label: String,
}

/// Ordered marker columns written in the TRC header
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerSet {
    markers: Vec<Marker>,
}

impl MarkerSet {
    pub fn new<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = (JointId, S)>,
        S: Into<String>,
    {
        Self {
            markers: markers
                .into_iter()
                .map(|(joint, label)| Marker {
                    joint,
                    label: label.into(),
                })
                .collect(),
        }
    }

    /// Full sensor joint set in column order
    pub fn sensor_joints() -> Self {
        Self::new(JointId::ALL.iter().map(|(id, _)| (*id, id.label())))
    }

    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.markers.iter().map(|marker| marker.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.markers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    /// First joint bound to more than one column
    pub fn duplicate_joint(&self) -> Option<JointId> {
        self.markers.iter().enumerate().find_map(|(i, marker)| {
            self.markers[..i]
                .iter()
                .any(|earlier| earlier.joint == marker.joint)
                .then_some(marker.joint)
        })
    }
}

impl Default for MarkerSet {
    fn default() -> Self {
        Self::sensor_joints()
    }
}

/// Bones drawn by the overlay renderer
pub const SKELETON_LIMBS: [(JointId, JointId); 19] = [
    (JointId::HandRight, JointId::WristRight),
    (JointId::WristRight, JointId::ElbowRight),
    (JointId::ElbowRight, JointId::ShoulderRight),
    (JointId::ShoulderRight, JointId::Neck),
    (JointId::HandLeft, JointId::WristLeft),
    (JointId::WristLeft, JointId::ElbowLeft),
    (JointId::ElbowLeft, JointId::ShoulderLeft),
    (JointId::ShoulderLeft, JointId::Neck),
    (JointId::Neck, JointId::Head),
    (JointId::Neck, JointId::SpineMid),
    (JointId::SpineMid, JointId::SpineBase),
    (JointId::SpineBase, JointId::HipRight),
    (JointId::HipRight, JointId::KneeRight),
    (JointId::KneeRight, JointId::AnkleRight),
    (JointId::AnkleRight, JointId::FootRight),
    (JointId::SpineBase, JointId::HipLeft),
    (JointId::HipLeft, JointId::KneeLeft),
    (JointId::KneeLeft, JointId::AnkleLeft),
    (JointId::AnkleLeft, JointId::FootLeft),
];

/// A bone ready for drawing
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limb {
    pub from: Position,
    pub to: Position,
    /// Sum of both joint weights, 0 (skip) through 4 (both tracked)
    pub confidence: u8,
}

impl Skeleton {
    /// Bones with at least one inferred or tracked end
    pub fn limbs(&self) -> Vec<Limb> {
        SKELETON_LIMBS
            .iter()
            .filter_map(|(a, b)| {
                let from = self.get(*a)?;
                let to = self.get(*b)?;
                let confidence = from.confidence.weight() + to.confidence.weight();
                (confidence > 0).then_some(Limb {
                    from: from.position,
                    to: to.position,
                    confidence,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_skeleton(confidence: TrackingConfidence) -> Skeleton {
        Skeleton::new(
            JointId::ALL
                .iter()
                .rev()
                .map(|(id, _)| JointSample::new(*id, Position::default(), confidence))
                .collect(),
        )
    }

    #[test]
    fn test_label_table_matches_enum_order() {
        for (i, (id, label)) in JointId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(id.label(), *label);
        }
        assert_eq!(JointId::ThumbRight.index(), JointId::COUNT - 1);
    }

    #[test]
    fn test_skeleton_sorts_joints_by_id() {
        let skeleton = full_skeleton(TrackingConfidence::Tracked);
        assert_eq!(skeleton.joint_count(), JointId::COUNT);
        assert_eq!(skeleton.joints()[0].id, JointId::SpineBase);
        assert_eq!(skeleton.joints()[24].id, JointId::ThumbRight);
    }

    #[test]
    fn test_partial_skeleton_lookup() {
        let skeleton = Skeleton::new(vec![JointSample::new(
            JointId::Head,
            Position::new(0.0, 1.6, 2.0),
            TrackingConfidence::Tracked,
        )]);
        assert_eq!(skeleton.count_of(JointId::Head), 1);
        assert_eq!(skeleton.count_of(JointId::Neck), 0);
        assert!(skeleton.get(JointId::Head).is_some());
        assert!(skeleton.get(JointId::Neck).is_none());
    }

    #[test]
    fn test_limb_confidence() {
        let tracked = full_skeleton(TrackingConfidence::Tracked);
        let limbs = tracked.limbs();
        assert_eq!(limbs.len(), SKELETON_LIMBS.len());
        assert!(limbs.iter().all(|limb| limb.confidence == 4));

        let lost = full_skeleton(TrackingConfidence::NotTracked);
        assert!(lost.limbs().is_empty());
    }

    #[test]
    fn test_sensor_marker_set() {
        let markers = MarkerSet::sensor_joints();
        assert_eq!(markers.len(), JointId::COUNT);
        assert_eq!(markers.labels().nth(2), Some("Neck"));
        assert_eq!(markers.markers()[2].joint, JointId::Neck);
        assert_eq!(markers.duplicate_joint(), None);
    }

    #[test]
    fn test_marker_set_reports_duplicate_joint() {
        let markers = MarkerSet::new([
            (JointId::Head, "A"),
            (JointId::Neck, "B"),
            (JointId::Head, "C"),
        ]);
        assert_eq!(markers.duplicate_joint(), Some(JointId::Head));
    }
}
