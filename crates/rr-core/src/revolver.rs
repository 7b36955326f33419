//! The firing engine.
//!
//! [`Revolver`] owns a [`Cylinder`] and the random source used to load and
//! spin it. A trigger pull reports [`FireOutcome::Live`] when the current
//! chamber is loaded, spends that round, and always moves the pointer on by
//! one chamber.

use std::collections::BTreeSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::RevolverConfig;
use crate::cylinder::Cylinder;
use crate::error::RevolverResult;
use crate::load::{LoadRange, generate_bullet_positions};
use crate::observer::{FireReport, RevolverObserver};

/// Result of a single trigger pull.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FireOutcome {
    /// A live round went off.
    Live,
    /// The chamber was empty.
    Blank,
}

impl FireOutcome {
    /// Returns true for [`FireOutcome::Live`].
    pub fn is_live(self) -> bool {
        matches!(self, Self::Live)
    }
}

impl std::fmt::Display for FireOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Live => write!(f, "BANG"),
            Self::Blank => write!(f, "click"),
        }
    }
}

/// A revolver: the cylinder, its random source, and any presentation observers.
pub struct Revolver {
    cylinder: Cylinder,
    range: LoadRange,
    rng: StdRng,
    observers: Vec<Box<dyn RevolverObserver>>,
}

impl std::fmt::Debug for Revolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Revolver")
            .field("cylinder", &self.cylinder)
            .field("range", &self.range)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl Revolver {
    /// Create an unloaded revolver, seeding its RNG from the config.
    ///
    /// Fails if the chamber count or live-round range is invalid.
    pub fn new(config: &RevolverConfig) -> RevolverResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(config.seed))
    }

    /// Create an unloaded revolver that draws from the given RNG.
    pub fn with_rng(config: &RevolverConfig, rng: StdRng) -> RevolverResult<Self> {
        let cylinder = Cylinder::new(config.chambers)?;
        let range = config.validate()?;
        Ok(Self {
            cylinder,
            range,
            rng,
            observers: Vec::new(),
        })
    }

    /// Register a presentation observer.
    pub fn add_observer<O: RevolverObserver + 'static>(&mut self, observer: O) {
        self.observers.push(Box::new(observer));
    }

    /// Read-only view of the cylinder.
    pub fn cylinder(&self) -> &Cylinder {
        &self.cylinder
    }

    /// The chamber that will be fired next.
    pub fn current_chamber(&self) -> usize {
        self.cylinder.current_chamber()
    }

    /// Number of chambers.
    pub fn max_chambers(&self) -> usize {
        self.cylinder.max_chambers()
    }

    /// Chambers currently holding a live round.
    pub fn bullet_positions(&self) -> &BTreeSet<usize> {
        self.cylinder.bullet_positions()
    }

    /// Live rounds left.
    pub fn live_remaining(&self) -> usize {
        self.cylinder.live_remaining()
    }

    /// Chambers not yet fired since the last reload.
    pub fn chambers_left(&self) -> usize {
        self.cylinder.chambers_left()
    }

    /// The configured default live-round range.
    pub fn load_range(&self) -> &LoadRange {
        &self.range
    }

    /// Pull the trigger.
    pub fn fire(&mut self) -> FireOutcome {
        let chamber = self.cylinder.current_chamber();
        let outcome = if self.cylinder.is_live(chamber) {
            self.cylinder.remove_live_at(chamber);
            FireOutcome::Live
        } else {
            FireOutcome::Blank
        };
        self.cylinder.advance();

        let report = FireReport {
            chamber,
            outcome,
            live_remaining: self.cylinder.live_remaining(),
        };
        debug!(chamber, %outcome, live_remaining = report.live_remaining, "fired");
        for observer in &mut self.observers {
            observer.on_fire(&report);
        }
        outcome
    }

    /// Spin the cylinder to a random chamber. The load is unchanged.
    pub fn spin(&mut self) {
        let chamber = self.rng.random_range(0..self.cylinder.max_chambers());
        self.cylinder.set_current(chamber);
        debug!(chamber, "spun");
        for observer in &mut self.observers {
            observer.on_spin(chamber);
        }
    }

    /// Replace the load with the given chambers and close at chamber 0.
    ///
    /// Out-of-range or repeated positions reject the whole reload and leave
    /// the revolver as it was.
    pub fn reload(&mut self, positions: impl IntoIterator<Item = usize>) -> RevolverResult<()> {
        let live = self
            .cylinder
            .validate_positions(positions)
            .inspect_err(|e| warn!(error = %e, "reload rejected"))?;
        self.install(live);
        Ok(())
    }

    /// Reload with a fresh random load drawn from the configured range.
    pub fn reload_random(&mut self) -> BTreeSet<usize> {
        let live = generate_bullet_positions(&mut self.rng, &self.range);
        self.install(live.clone());
        live
    }

    /// Draw a random load for the given range without installing it.
    pub fn generate_bullet_positions(
        &mut self,
        min: usize,
        max: usize,
    ) -> RevolverResult<BTreeSet<usize>> {
        let range = LoadRange::new(min, max, self.cylinder.max_chambers())?;
        Ok(generate_bullet_positions(&mut self.rng, &range))
    }

    fn install(&mut self, live: BTreeSet<usize>) {
        debug!(positions = ?live, "reloaded");
        self.cylinder.install(live);
        let positions = self.cylinder.bullet_positions().clone();
        for observer in &mut self.observers {
            observer.on_reload(&positions);
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use proptest::prelude::*;

    use super::*;
    use crate::error::RevolverError;

    fn revolver(chambers: usize) -> Revolver {
        let config = RevolverConfig::default()
            .with_chambers(chambers)
            .with_live_range(0, chambers);
        Revolver::new(&config).unwrap()
    }

    #[derive(Debug, Default, Clone)]
    struct Recorder {
        shots: Rc<RefCell<Vec<FireReport>>>,
        spins: Rc<RefCell<usize>>,
        reloads: Rc<RefCell<usize>>,
    }

    impl RevolverObserver for Recorder {
        fn on_fire(&mut self, report: &FireReport) {
            self.shots.borrow_mut().push(*report);
        }

        fn on_spin(&mut self, _chamber: usize) {
            *self.spins.borrow_mut() += 1;
        }

        fn on_reload(&mut self, _positions: &BTreeSet<usize>) {
            *self.reloads.borrow_mut() += 1;
        }
    }

    #[test]
    fn six_shot_scenario() {
        let mut r = revolver(6);
        r.reload([1, 3]).unwrap();
        assert_eq!(r.current_chamber(), 0);

        let outcomes: Vec<_> = (0..6).map(|_| r.fire()).collect();
        assert_eq!(
            outcomes,
            vec![
                FireOutcome::Blank,
                FireOutcome::Live,
                FireOutcome::Blank,
                FireOutcome::Live,
                FireOutcome::Blank,
                FireOutcome::Blank,
            ]
        );
        assert!(r.bullet_positions().is_empty());
        assert_eq!(r.current_chamber(), 0);
        assert_eq!(r.chambers_left(), 0);
    }

    #[test]
    fn spent_round_does_not_recur() {
        let mut r = revolver(2);
        r.reload([0]).unwrap();
        assert_eq!(r.fire(), FireOutcome::Live);
        assert_eq!(r.fire(), FireOutcome::Blank);
        assert_eq!(r.fire(), FireOutcome::Blank);
    }

    #[test]
    fn invalid_reload_leaves_state_unchanged() {
        let mut r = revolver(6);
        r.reload([2, 4]).unwrap();
        r.fire();
        let before = r.cylinder().clone();

        assert_eq!(
            r.reload([1, 9]),
            Err(RevolverError::PositionOutOfRange {
                position: 9,
                chambers: 6
            })
        );
        assert_eq!(r.reload([5, 5]), Err(RevolverError::DuplicatePosition(5)));
        assert_eq!(r.cylinder(), &before);
    }

    #[test]
    fn reload_random_installs_generated_load() {
        let mut r = Revolver::new(&RevolverConfig::default()).unwrap();
        let live = r.reload_random();
        assert_eq!(r.bullet_positions(), &live);
        assert!((1..=3).contains(&live.len()));
        assert_eq!(r.current_chamber(), 0);
    }

    #[test]
    fn generate_does_not_install() {
        let mut r = revolver(6);
        r.reload([0]).unwrap();
        let drawn = r.generate_bullet_positions(2, 2).unwrap();
        assert_eq!(drawn.len(), 2);
        assert_eq!(r.bullet_positions(), &BTreeSet::from([0]));
    }

    #[test]
    fn generate_rejects_bad_range() {
        let mut r = revolver(6);
        assert!(matches!(
            r.generate_bullet_positions(3, 1),
            Err(RevolverError::InvalidLoadRange { .. })
        ));
        assert!(matches!(
            r.generate_bullet_positions(0, 7),
            Err(RevolverError::InvalidLoadRange { .. })
        ));
    }

    #[test]
    fn invalid_config_rejected() {
        let config = RevolverConfig::default().with_live_range(2, 1);
        assert!(Revolver::new(&config).is_err());
    }

    #[test]
    fn same_seed_same_game() {
        let config = RevolverConfig::default().with_seed(1234);
        let mut a = Revolver::new(&config).unwrap();
        let mut b = Revolver::new(&config).unwrap();
        assert_eq!(a.reload_random(), b.reload_random());
        for _ in 0..20 {
            a.spin();
            b.spin();
            assert_eq!(a.current_chamber(), b.current_chamber());
        }
    }

    #[test]
    fn spin_is_roughly_uniform() {
        let mut r = revolver(6);
        r.reload([0, 2]).unwrap();
        let mut counts = [0usize; 6];
        for _ in 0..60_000 {
            r.spin();
            counts[r.current_chamber()] += 1;
        }
        for count in counts {
            assert!((9_000..=11_000).contains(&count), "counts: {counts:?}");
        }
        assert_eq!(r.bullet_positions(), &BTreeSet::from([0, 2]));
    }

    #[test]
    fn observers_see_every_transition() {
        let recorder = Recorder::default();
        let mut r = revolver(6);
        r.add_observer(recorder.clone());

        r.reload([0]).unwrap();
        r.fire();
        r.spin();
        r.fire();

        let shots = recorder.shots.borrow();
        assert_eq!(shots.len(), 2);
        assert_eq!(
            shots[0],
            FireReport {
                chamber: 0,
                outcome: FireOutcome::Live,
                live_remaining: 0
            }
        );
        assert_eq!(*recorder.spins.borrow(), 1);
        assert_eq!(*recorder.reloads.borrow(), 1);
    }

    #[test]
    fn outcome_display_and_serde() {
        assert_eq!(FireOutcome::Live.to_string(), "BANG");
        assert_eq!(FireOutcome::Blank.to_string(), "click");
        assert_eq!(serde_json::to_string(&FireOutcome::Live).unwrap(), "\"live\"");
        assert!(FireOutcome::Live.is_live());
        assert!(!FireOutcome::Blank.is_live());
    }

    fn chambers_and_load() -> impl Strategy<Value = (usize, BTreeSet<usize>)> {
        (1usize..12).prop_flat_map(|c| (Just(c), proptest::collection::btree_set(0..c, 0..=c)))
    }

    proptest! {
        #[test]
        fn each_live_chamber_fires_once_per_revolution(
            (chambers, load) in chambers_and_load(),
            spins in 0usize..4,
        ) {
            let mut r = revolver(chambers);
            r.reload(load.iter().copied()).unwrap();
            for _ in 0..spins {
                r.spin();
            }
            let start = r.current_chamber();

            let mut live_hits = BTreeSet::new();
            for _ in 0..chambers {
                let chamber = r.current_chamber();
                match r.fire() {
                    FireOutcome::Live => prop_assert!(live_hits.insert(chamber)),
                    FireOutcome::Blank => prop_assert!(!load.contains(&chamber)),
                }
            }
            prop_assert_eq!(live_hits, load);
            prop_assert_eq!(r.current_chamber(), start);
            prop_assert!(r.bullet_positions().is_empty());
        }

        #[test]
        fn fire_always_advances_by_one(
            (chambers, load) in chambers_and_load(),
            shots in 1usize..30,
        ) {
            let mut r = revolver(chambers);
            r.reload(load).unwrap();
            for _ in 0..shots {
                let before = r.current_chamber();
                r.fire();
                prop_assert_eq!(r.current_chamber(), (before + 1) % chambers);
            }
        }

        #[test]
        fn reload_installs_exactly_the_given_set(
            (chambers, load) in chambers_and_load(),
            warmup in 0usize..10,
        ) {
            let mut r = revolver(chambers);
            for _ in 0..warmup {
                r.fire();
                r.spin();
            }
            r.reload(load.iter().copied()).unwrap();
            prop_assert_eq!(r.bullet_positions(), &load);
            prop_assert_eq!(r.current_chamber(), 0);
        }

        #[test]
        fn spin_never_changes_the_load(
            (chambers, load) in chambers_and_load(),
            spins in 1usize..20,
        ) {
            let mut r = revolver(chambers);
            r.reload(load.iter().copied()).unwrap();
            for _ in 0..spins {
                r.spin();
                prop_assert!(r.current_chamber() < chambers);
                prop_assert_eq!(r.bullet_positions(), &load);
            }
        }
    }
}
