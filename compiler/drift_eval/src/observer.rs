//! Entropy observation.
//!
//! Every value carries an observation record that tracks the Shannon-style
//! entropy of its successive states. Assignments and calls feed the record;
//! interrogatives read it back; the six state predicates and the loop stall
//! detector classify the most recent record in the global `__observer__`
//! binding.

use drift_stack::ensure_sufficient_stack;

use crate::value::{Value, ValueKind};

/// An entropy delta smaller than this counts as no change at all.
pub(crate) const SETTLED_DELTA: f64 = 0.001;

/// Deltas past this magnitude read as active improvement or divergence.
pub(crate) const DRIFT_DELTA: f64 = 0.01;

/// Entropy below this bar counts as a low-information, converged state.
pub(crate) const LOW_ENTROPY: f64 = 0.1;

/// Consecutive unchanged high-entropy iterations before a loop stalls out.
pub(crate) const STALL_LIMIT: u32 = 100;

/// Per-value observation record.
///
/// `dh` is the entropy delta measured by the most recent observation,
/// `prev_dh` the one before it; a sign flip between the two is the
/// oscillation signal. `last_entropy` is the baseline the next delta is
/// measured against, and `obs_age` counts how many times the value has
/// been observed.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Observation {
    pub entropy: f64,
    pub dh: f64,
    pub prev_dh: f64,
    pub last_entropy: f64,
    pub obs_age: u32,
}

impl Observation {
    /// Fold a newly measured entropy into the record.
    pub fn record(&mut self, new_entropy: f64) {
        self.prev_dh = self.dh;
        self.dh = new_entropy - self.last_entropy;
        self.entropy = new_entropy;
        self.last_entropy = new_entropy;
        self.obs_age += 1;
    }
}

/// Measure the entropy of a value's current state.
///
/// Numbers map through a binary-entropy curve of `p = 1 / (1 + |x|)`, so
/// magnitudes near zero and near one read as settled while mid-range
/// magnitudes read as uncertain. Text is the Shannon entropy of its byte
/// distribution. A list averages its elements and adds `log2(count + 1)`
/// for its own structure. Callables are opaque and fixed at 1.0.
pub fn entropy(value: &Value) -> f64 {
    match &value.kind {
        ValueKind::Null => 0.0,
        ValueKind::Num(x) => {
            let magnitude = x.abs();
            if magnitude == 0.0 || magnitude == 1.0 {
                return 0.0;
            }
            let p = 1.0 / (1.0 + magnitude);
            if p <= 0.0 || p >= 1.0 {
                return 0.0;
            }
            -(p * p.log2() + (1.0 - p) * (1.0 - p).log2())
        }
        ValueKind::Text(text) => byte_entropy(text.as_bytes()),
        ValueKind::List(items) => {
            let items = items.borrow();
            if items.is_empty() {
                return 0.0;
            }
            let sum: f64 = ensure_sufficient_stack(|| items.iter().map(entropy).sum());
            sum / items.len() as f64 + ((items.len() + 1) as f64).log2()
        }
        ValueKind::Function(_) | ValueKind::Native(_) => 1.0,
    }
}

fn byte_entropy(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    let mut freq = [0u32; 256];
    for &b in bytes {
        freq[usize::from(b)] += 1;
    }
    let len = bytes.len() as f64;
    freq.iter()
        .filter(|&&count| count > 0)
        .map(|&count| {
            let p = f64::from(count) / len;
            -(p * p.log2())
        })
        .sum()
}

/// Measure a value and fold the result into its observation record.
pub fn observe(value: &mut Value) {
    let measured = entropy(value);
    value.obs.record(measured);
}

/// One-word classification of an observation, as reported to programs.
///
/// Checks run in priority order: a sign flip wins outright, then large
/// deltas, then settled states split by entropy level.
pub fn classify(obs: &Observation) -> &'static str {
    let Observation {
        entropy: h,
        dh,
        prev_dh,
        ..
    } = *obs;
    if prev_dh != 0.0 && dh * prev_dh < 0.0 && dh.abs() > SETTLED_DELTA {
        return "oscillating";
    }
    if dh > DRIFT_DELTA {
        return "diverging";
    }
    if dh < -DRIFT_DELTA {
        return "improving";
    }
    if dh.abs() < SETTLED_DELTA && h < LOW_ENTROPY {
        return "converged";
    }
    if dh.abs() < SETTLED_DELTA {
        return "equilibrium";
    }
    "stable"
}

/// Whether an observation is a sign-flipping oscillation.
pub(crate) fn is_oscillating(obs: &Observation) -> bool {
    obs.prev_dh != 0.0 && obs.dh * obs.prev_dh < 0.0 && obs.dh.abs() > SETTLED_DELTA
}

/// Evaluate one of the six state predicates against an observation.
pub(crate) fn predicate_holds(kind: drift_ir::PredicateKind, obs: &Observation) -> bool {
    use drift_ir::PredicateKind;
    match kind {
        PredicateKind::Converged => obs.dh.abs() < SETTLED_DELTA && obs.entropy < LOW_ENTROPY,
        PredicateKind::Stable => {
            obs.dh.abs() < DRIFT_DELTA && obs.entropy >= LOW_ENTROPY && !is_oscillating(obs)
        }
        PredicateKind::Improving => obs.dh < -SETTLED_DELTA,
        PredicateKind::Oscillating => is_oscillating(obs),
        PredicateKind::Diverging => obs.dh > SETTLED_DELTA,
        PredicateKind::Equilibrium => obs.dh.abs() < SETTLED_DELTA,
    }
}

#[cfg(test)]
mod tests {
    use drift_ir::PredicateKind;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    use super::*;

    fn close(actual: f64, expected: f64) -> bool {
        (actual - expected).abs() < 1e-6
    }

    #[test]
    fn null_and_fixed_points_have_zero_entropy() {
        assert_eq!(entropy(&Value::null()), 0.0);
        assert_eq!(entropy(&Value::num(0.0)), 0.0);
        assert_eq!(entropy(&Value::num(1.0)), 0.0);
        assert_eq!(entropy(&Value::num(-1.0)), 0.0);
        assert_eq!(entropy(&Value::num(f64::INFINITY)), 0.0);
    }

    #[test]
    fn numeric_entropy_follows_the_binary_curve() {
        // p = 1/5 for |x| = 4
        assert!(close(entropy(&Value::num(4.0)), 0.721_928));
        // symmetric in sign and in magnitude inversion: h(2) == h(1/2)
        assert_eq!(entropy(&Value::num(2.0)), entropy(&Value::num(-2.0)));
        assert!(close(entropy(&Value::num(2.0)), entropy(&Value::num(0.5))));
    }

    #[test]
    fn text_entropy_counts_byte_variety() {
        assert_eq!(entropy(&Value::text("")), 0.0);
        assert_eq!(entropy(&Value::text("aaaa")), 0.0);
        assert!(close(entropy(&Value::text("ab")), 1.0));
        assert!(close(entropy(&Value::text("abcd")), 2.0));
    }

    #[test]
    fn list_entropy_adds_structure_to_the_element_mean() {
        assert_eq!(entropy(&Value::list(vec![])), 0.0);
        // one settled element: 0/1 + log2(2)
        assert!(close(entropy(&Value::list(vec![Value::num(0.0)])), 1.0));
        // mean 0.721928 + log2(3)
        let pair = Value::list(vec![Value::num(4.0), Value::num(4.0)]);
        assert!(close(entropy(&pair), 0.721_928 + 1.584_963));
    }

    #[test]
    fn recording_tracks_deltas_and_age() {
        let mut value = Value::num(4.0);
        observe(&mut value);
        assert!(close(value.obs.entropy, 0.721_928));
        assert!(close(value.obs.dh, 0.721_928));
        assert_eq!(value.obs.prev_dh, 0.0);
        assert_eq!(value.obs.obs_age, 1);

        observe(&mut value);
        assert_eq!(value.obs.dh, 0.0);
        assert!(close(value.obs.prev_dh, 0.721_928));
        assert_eq!(value.obs.obs_age, 2);
    }

    #[test]
    fn classification_priority_order() {
        let osc = Observation {
            entropy: 0.5,
            dh: -0.5,
            prev_dh: 0.5,
            ..Observation::default()
        };
        assert_eq!(classify(&osc), "oscillating");

        let diverging = Observation {
            dh: 0.02,
            ..Observation::default()
        };
        assert_eq!(classify(&diverging), "diverging");

        let improving = Observation {
            dh: -0.02,
            ..Observation::default()
        };
        assert_eq!(classify(&improving), "improving");

        let converged = Observation {
            entropy: 0.05,
            dh: 0.0005,
            ..Observation::default()
        };
        assert_eq!(classify(&converged), "converged");

        let equilibrium = Observation {
            entropy: 0.5,
            dh: 0.0005,
            ..Observation::default()
        };
        assert_eq!(classify(&equilibrium), "equilibrium");

        let stable = Observation {
            entropy: 0.5,
            dh: 0.005,
            ..Observation::default()
        };
        assert_eq!(classify(&stable), "stable");
    }

    #[test]
    fn fresh_record_classifies_as_converged() {
        assert_eq!(classify(&Observation::default()), "converged");
        assert!(predicate_holds(
            PredicateKind::Converged,
            &Observation::default()
        ));
        assert!(predicate_holds(
            PredicateKind::Equilibrium,
            &Observation::default()
        ));
    }

    #[test]
    fn stable_excludes_oscillation() {
        let osc = Observation {
            entropy: 0.5,
            dh: -0.005,
            prev_dh: 0.005,
            ..Observation::default()
        };
        assert!(predicate_holds(PredicateKind::Oscillating, &osc));
        assert!(!predicate_holds(PredicateKind::Stable, &osc));
    }

    proptest! {
        #[test]
        fn numeric_entropy_is_never_negative(x in proptest::num::f64::NORMAL | proptest::num::f64::ZERO | proptest::num::f64::SUBNORMAL | proptest::num::f64::INFINITE) {
            prop_assert!(entropy(&Value::num(x)) >= 0.0);
        }

        #[test]
        fn text_entropy_is_never_negative(s in "\\PC*") {
            prop_assert!(entropy(&Value::text(s.as_str())) >= 0.0);
        }

        #[test]
        fn numeric_list_entropy_is_never_negative(xs in proptest::collection::vec(-1e9f64..1e9, 0..8)) {
            let items: Vec<Value> = xs.into_iter().map(Value::num).collect();
            prop_assert!(entropy(&Value::list(items)) >= 0.0);
        }

        #[test]
        fn converged_and_diverging_are_exclusive(
            dh in -1.0f64..1.0,
            prev_dh in -1.0f64..1.0,
            h in 0.0f64..4.0,
        ) {
            let obs = Observation { entropy: h, dh, prev_dh, last_entropy: h, obs_age: 1 };
            prop_assert!(!(predicate_holds(PredicateKind::Converged, &obs)
                && predicate_holds(PredicateKind::Diverging, &obs)));
            prop_assert!(!(predicate_holds(PredicateKind::Improving, &obs)
                && predicate_holds(PredicateKind::Diverging, &obs)));
        }
    }
}
