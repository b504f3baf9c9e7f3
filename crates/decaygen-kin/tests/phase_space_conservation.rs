use decaygen_core::{FourMomentum, PhaseSpaceMap, RawState};
use decaygen_kin::constants::{ELECTRON_MASS, MUON_MASS};
use decaygen_kin::{FourBodyPhaseSpace, ParentSpecies, ThreeBodyPhaseSpace};
use proptest::prelude::*;

fn total(momenta: &[FourMomentum]) -> FourMomentum {
    momenta
        .iter()
        .copied()
        .fold(FourMomentum::default(), |acc, p| acc + p)
}

fn assert_conserved(momenta: &[FourMomentum], masses: &[f64]) {
    let sum = total(momenta);
    assert!((sum.e - MUON_MASS).abs() < 1e-9, "energy {}", sum.e);
    assert!(sum.momentum() < 1e-9, "momentum {}", sum.momentum());
    for (p, mass) in momenta.iter().zip(masses) {
        assert!((p.mass() - mass).abs() < 1e-6, "mass {} vs {mass}", p.mass());
        assert!(p.e >= *mass);
    }
}

proptest! {
    #[test]
    fn three_body_events_conserve_four_momentum(raw in prop::array::uniform5(0.0f64..=1.0)) {
        let map = ThreeBodyPhaseSpace::muon_decay(ParentSpecies::MuonMinus).unwrap();
        let event = map.map(&RawState(raw));
        assert_conserved(&event.final_state, &[ELECTRON_MASS, 0.0, 0.0]);
        prop_assert!(event.weight >= 0.0);
    }

    #[test]
    fn four_body_events_conserve_four_momentum(raw in prop::array::uniform8(0.0f64..=1.0)) {
        let map = FourBodyPhaseSpace::radiative_muon_decay(ParentSpecies::MuonPlus).unwrap();
        let event = map.map(&RawState(raw));
        assert_conserved(&event.final_state, &[ELECTRON_MASS, 0.0, 0.0, 0.0]);
        prop_assert!(event.weight >= 0.0);
    }
}

#[test]
fn map_is_bit_reproducible() {
    let map = FourBodyPhaseSpace::radiative_muon_decay(ParentSpecies::MuonMinus).unwrap();
    let raw = RawState([0.3, 0.7, 0.1, 0.9, 0.5, 0.25, 0.75, 0.6]);
    let a = map.map(&raw);
    let b = map.map(&raw);
    assert_eq!(a.weight.to_bits(), b.weight.to_bits());
    assert_eq!(a, b);
}

#[test]
fn closed_channels_are_rejected() {
    assert!(ThreeBodyPhaseSpace::new(1.0, [0.5, 0.5, 0.5]).is_err());
    assert!(ThreeBodyPhaseSpace::new(10.0, [-1.0, 0.0, 0.0]).is_err());
    let map = ThreeBodyPhaseSpace::new(10.0, [1.0, 2.0, 3.0]).unwrap();
    assert_eq!(map.generator().dimension(), 5);
    assert_eq!(map.generator().bodies(), 3);
}
