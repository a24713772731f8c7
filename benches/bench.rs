#![feature(test)]
extern crate test;
use helixblock::constraint::{HelixConstraint, SeedConstraint};
use helixblock::energy::BasePairEnergy;
use helixblock::helix::{new_helix_handler, HelixModel};
use helixblock::interaction::IndexRange;
use helixblock::predictor::HelixBlockPredictor;
use helixblock::seed::{SeedHandler, SeedHandlerMfe};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
const SEED: u64 = 1293890;
const SHORT_LEN: usize = 200;

fn random_seq<R: Rng>(rng: &mut R, len: usize) -> Vec<u8> {
    (0..len).map(|_| b"ACGU"[rng.gen_range(0..4)]).collect()
}

fn random_energy(len1: usize, len2: usize) -> BasePairEnergy {
    let mut rng: Xoshiro256StarStar = SeedableRng::seed_from_u64(SEED);
    let seq1 = random_seq(&mut rng, len1);
    let seq2 = random_seq(&mut rng, len2);
    BasePairEnergy::new(&seq1, &seq2)
        .unwrap()
        .with_max_internal_loop_size(8, 8)
}

fn bench_fill(b: &mut test::Bencher, model: HelixModel, max_il: usize) {
    let energy = random_energy(SHORT_LEN, SHORT_LEN);
    let constraint = HelixConstraint::new(2, 10, max_il, 999., 0., false).unwrap();
    let mut handler = new_helix_handler(&energy, constraint, model);
    b.iter(|| handler.fill_helix(0, SHORT_LEN - 1, 0, SHORT_LEN - 1));
}

#[bench]
fn fill_stacking(b: &mut test::Bencher) {
    bench_fill(b, HelixModel::StackingOnly, 0);
}

#[bench]
fn fill_nobulge(b: &mut test::Bencher) {
    bench_fill(b, HelixModel::NoBulgeMax, 0);
}

#[bench]
fn fill_unpaired(b: &mut test::Bencher) {
    bench_fill(b, HelixModel::Unpaired, 2);
}

#[bench]
fn fill_seed(b: &mut test::Bencher) {
    let energy = random_energy(SHORT_LEN, SHORT_LEN);
    let constraint = SeedConstraint::new(5, 1).unwrap();
    let mut seed = SeedHandlerMfe::new(&energy, constraint);
    b.iter(|| seed.fill_seed(0, SHORT_LEN - 1, 0, SHORT_LEN - 1));
}

#[bench]
fn predict_seeded(b: &mut test::Bencher) {
    let energy = random_energy(SHORT_LEN, SHORT_LEN / 2);
    let constraint = HelixConstraint::new(2, 10, 0, 999., 0., false).unwrap();
    let helix = new_helix_handler(&energy, constraint, HelixModel::Auto);
    let seed = SeedHandlerMfe::new(&energy, SeedConstraint::new(5, 0).unwrap());
    let mut predictor = HelixBlockPredictor::new(&energy, helix)
        .with_seed_handler(Box::new(seed))
        .unwrap();
    let r1 = IndexRange::new(0, SHORT_LEN - 1);
    let r2 = IndexRange::new(0, SHORT_LEN / 2 - 1);
    b.iter(|| predictor.predict(r1, r2, 3).unwrap());
}
