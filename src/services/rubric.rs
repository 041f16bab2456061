//! TGMD-3 rubric reference data.
//!
//! The twelve motor-skill behaviors the backend can grade, each scored on a
//! three-level rubric (0 emerging, 1 developing, 2 mature). Used to validate
//! behavior codes before submission and to fill in rubric text when the
//! backend omits it from a result payload.

/// One behavior with its per-level rubric labels.
///
/// `labels[pred]` / `labels_es[pred]` is the rubric text for that score.
#[derive(Debug, Clone, Copy)]
pub struct BehaviorEntry {
    pub id: &'static str,
    pub name: &'static str,
    pub name_es: &'static str,
    pub labels: [&'static str; 3],
    pub labels_es: [&'static str; 3],
}

/// The full TGMD-3 behavior catalog, in code order: locomotor skills
/// (A01-A04) followed by the two ball-skill groups (B01-B04, C01-C04).
pub const BEHAVIORS: &[BehaviorEntry; 12] = &[
    BehaviorEntry {
        id: "A01",
        name: "Run",
        name_es: "Carrera",
        labels: [
            "Emerging run pattern, performance criteria largely absent",
            "Developing run pattern, some performance criteria met",
            "Mature run pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de carrera emergente",
            "Patrón de carrera en desarrollo",
            "Patrón de carrera maduro",
        ],
    },
    BehaviorEntry {
        id: "A02",
        name: "Gallop",
        name_es: "Galope",
        labels: [
            "Emerging gallop pattern, performance criteria largely absent",
            "Developing gallop pattern, some performance criteria met",
            "Mature gallop pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de galope emergente",
            "Patrón de galope en desarrollo",
            "Patrón de galope maduro",
        ],
    },
    BehaviorEntry {
        id: "A03",
        name: "Hop",
        name_es: "Salto en un pie",
        labels: [
            "Emerging hop pattern, performance criteria largely absent",
            "Developing hop pattern, some performance criteria met",
            "Mature hop pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de salto en un pie emergente",
            "Patrón de salto en un pie en desarrollo",
            "Patrón de salto en un pie maduro",
        ],
    },
    BehaviorEntry {
        id: "A04",
        name: "Horizontal jump",
        name_es: "Salto horizontal",
        labels: [
            "Emerging jump pattern, performance criteria largely absent",
            "Developing jump pattern, some performance criteria met",
            "Mature jump pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de salto horizontal emergente",
            "Patrón de salto horizontal en desarrollo",
            "Patrón de salto horizontal maduro",
        ],
    },
    BehaviorEntry {
        id: "B01",
        name: "Two-hand catch",
        name_es: "Atrapada a dos manos",
        labels: [
            "Emerging catch pattern, performance criteria largely absent",
            "Developing catch pattern, some performance criteria met",
            "Mature catch pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de atrapada emergente",
            "Patrón de atrapada en desarrollo",
            "Patrón de atrapada maduro",
        ],
    },
    BehaviorEntry {
        id: "B02",
        name: "Kick",
        name_es: "Patada a balón estático",
        labels: [
            "Emerging kick pattern, performance criteria largely absent",
            "Developing kick pattern, some performance criteria met",
            "Mature kick pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de patada emergente",
            "Patrón de patada en desarrollo",
            "Patrón de patada maduro",
        ],
    },
    BehaviorEntry {
        id: "B03",
        name: "Overhand throw",
        name_es: "Lanzamiento por encima del hombro",
        labels: [
            "Emerging throw pattern, performance criteria largely absent",
            "Developing throw pattern, some performance criteria met",
            "Mature throw pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de lanzamiento emergente",
            "Patrón de lanzamiento en desarrollo",
            "Patrón de lanzamiento maduro",
        ],
    },
    BehaviorEntry {
        id: "B04",
        name: "Stationary dribble",
        name_es: "Bote estacionario",
        labels: [
            "Emerging dribble pattern, performance criteria largely absent",
            "Developing dribble pattern, some performance criteria met",
            "Mature dribble pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de bote emergente",
            "Patrón de bote en desarrollo",
            "Patrón de bote maduro",
        ],
    },
    BehaviorEntry {
        id: "C01",
        name: "Two-hand strike",
        name_es: "Golpeo a dos manos",
        labels: [
            "Emerging strike pattern, performance criteria largely absent",
            "Developing strike pattern, some performance criteria met",
            "Mature strike pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de golpeo a dos manos emergente",
            "Patrón de golpeo a dos manos en desarrollo",
            "Patrón de golpeo a dos manos maduro",
        ],
    },
    BehaviorEntry {
        id: "C02",
        name: "One-hand forehand strike",
        name_es: "Golpeo de derecha",
        labels: [
            "Emerging forehand pattern, performance criteria largely absent",
            "Developing forehand pattern, some performance criteria met",
            "Mature forehand pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de golpeo de derecha emergente",
            "Patrón de golpeo de derecha en desarrollo",
            "Patrón de golpeo de derecha maduro",
        ],
    },
    BehaviorEntry {
        id: "C03",
        name: "Underhand throw",
        name_es: "Lanzamiento por debajo del hombro",
        labels: [
            "Emerging underhand throw, performance criteria largely absent",
            "Developing underhand throw, some performance criteria met",
            "Mature underhand throw, all performance criteria met",
        ],
        labels_es: [
            "Patrón de lanzamiento por debajo emergente",
            "Patrón de lanzamiento por debajo en desarrollo",
            "Patrón de lanzamiento por debajo maduro",
        ],
    },
    BehaviorEntry {
        id: "C04",
        name: "Slide",
        name_es: "Deslizamiento lateral",
        labels: [
            "Emerging slide pattern, performance criteria largely absent",
            "Developing slide pattern, some performance criteria met",
            "Mature slide pattern, all performance criteria met",
        ],
        labels_es: [
            "Patrón de deslizamiento emergente",
            "Patrón de deslizamiento en desarrollo",
            "Patrón de deslizamiento maduro",
        ],
    },
];

/// Look up a behavior by its code.
pub fn find_behavior(behavior_id: &str) -> Option<&'static BehaviorEntry> {
    BEHAVIORS.iter().find(|b| b.id == behavior_id)
}

pub fn is_known_behavior(behavior_id: &str) -> bool {
    find_behavior(behavior_id).is_some()
}

/// English rubric text for `(behavior_id, pred)`, if both are known.
pub fn rubric_label(behavior_id: &str, pred: u8) -> Option<&'static str> {
    find_behavior(behavior_id).and_then(|b| b.labels.get(pred as usize).copied())
}

/// Spanish rubric text for `(behavior_id, pred)`, if both are known.
pub fn rubric_label_es(behavior_id: &str, pred: u8) -> Option<&'static str> {
    find_behavior(behavior_id).and_then(|b| b.labels_es.get(pred as usize).copied())
}
