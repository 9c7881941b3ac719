use super::model::Engine;

// ---------------------------------------------------------------------------
// Loadout – engines the user has put on their ship
// ---------------------------------------------------------------------------

const DEFAULT_MAX_OUTFIT_SPACE: f64 = 100.0;

/// Engines picked for the user's ship plus the outfit space budget.
///
/// Engines are stored as indices into the catalog's engine list, so the same
/// engine may appear more than once.
#[derive(Debug, Clone, PartialEq)]
pub struct Loadout {
    pub engines: Vec<usize>,
    /// Space taken by outfits that are not engines.
    pub otherwise_occupied: f64,
    pub max_outfit_space: f64,
}

impl Default for Loadout {
    fn default() -> Self {
        Self {
            engines: Vec::new(),
            otherwise_occupied: 0.0,
            max_outfit_space: DEFAULT_MAX_OUTFIT_SPACE,
        }
    }
}

impl Loadout {
    pub fn add(&mut self, engine: usize) {
        self.engines.push(engine);
    }

    /// Remove one occurrence of `engine`, if present.
    pub fn remove(&mut self, engine: usize) {
        if let Some(pos) = self.engines.iter().position(|&e| e == engine) {
            self.engines.remove(pos);
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Space used by the selected engines plus `otherwise_occupied`.
    ///
    /// Outfit space is stored negated, so an engine taking 20 units holds
    /// `-20` and adds 20 here. Indices outside `engines` are ignored.
    pub fn occupied_outfit_space(&self, engines: &[Engine]) -> f64 {
        self.engines
            .iter()
            .filter_map(|&idx| engines.get(idx))
            .filter_map(Engine::outfit_space)
            .map(|space| -space)
            .sum::<f64>()
            + self.otherwise_occupied
    }

    pub fn free_outfit_space(&self, engines: &[Engine]) -> f64 {
        self.max_outfit_space - self.occupied_outfit_space(engines)
    }

    pub fn is_over_capacity(&self, engines: &[Engine]) -> bool {
        self.free_outfit_space(engines) < 0.0
    }
}

/// Step for the loadout's number inputs: 1 below 10, otherwise the value's
/// order of magnitude.
pub fn input_step(value: f64) -> f64 {
    if !(value >= 10.0) {
        return 1.0;
    }
    10f64.powf(value.log10().floor())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::FieldValue;

    fn engine(space: Option<f64>) -> Engine {
        let mut e = Engine::new();
        e.insert("name", FieldValue::Text("E".into()));
        if let Some(space) = space {
            e.insert("outfit space", FieldValue::Number(space));
        }
        e
    }

    #[test]
    fn occupied_space_uses_magnitudes() {
        let engines = vec![engine(Some(-20.0)), engine(None), engine(Some(-5.5))];
        let mut loadout = Loadout::default();
        loadout.add(0);
        loadout.add(0);
        loadout.add(1);
        loadout.add(2);
        loadout.add(9);
        loadout.otherwise_occupied = 10.0;
        assert_eq!(loadout.occupied_outfit_space(&engines), 55.5);
        assert_eq!(loadout.free_outfit_space(&engines), 44.5);
        assert!(!loadout.is_over_capacity(&engines));
    }

    #[test]
    fn remove_takes_one_occurrence() {
        let mut loadout = Loadout::default();
        loadout.add(3);
        loadout.add(3);
        loadout.remove(3);
        assert_eq!(loadout.engines, vec![3]);
        loadout.reset();
        assert_eq!(loadout, Loadout::default());
    }

    #[test]
    fn step_follows_magnitude() {
        assert_eq!(input_step(0.0), 1.0);
        assert_eq!(input_step(9.0), 1.0);
        assert_eq!(input_step(250.0), 100.0);
    }
}
