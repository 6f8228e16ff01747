//! Data precomputed once per fold for the faster table algorithm.

use tf_energy::{Energy, EnergyModel, Primary};

/// Branch cost lookups shared by every multiloop case: per-branch
/// initiation plus the helix-end penalty for that closing pair.
pub(crate) struct Precomp {
    pub augubranch: [[Energy; 4]; 4],
}

impl Precomp {
    pub fn new(em: &EnergyModel) -> Self {
        let mut augubranch = [[0; 4]; 4];
        for (a, row) in augubranch.iter_mut().enumerate() {
            for (b, e) in row.iter_mut().enumerate() {
                *e = em.multiloop_b + em.au_gu_penalty(a as u8, b as u8);
            }
        }
        Precomp { augubranch }
    }
}

/// Two-loop energy with the dominant stack case dispatched without the
/// bulge/internal classification.
pub(crate) fn fast_two_loop(
    em: &EnergyModel,
    r: &Primary,
    ost: i32,
    oen: i32,
    ist: i32,
    ien: i32,
) -> Energy {
    if ist == ost + 1 && ien == oen - 1 {
        return em.stack[r[ost as usize] as usize][r[ist as usize] as usize]
            [r[ien as usize] as usize][r[oen as usize] as usize];
    }
    em.two_loop(r, ost as usize, oen as usize, ist as usize, ien as usize)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_augubranch_matches_model() {
        let em = EnergyModel::random(3);
        let pc = Precomp::new(&em);
        for a in 0..4u8 {
            for b in 0..4u8 {
                assert_eq!(
                    pc.augubranch[a as usize][b as usize],
                    em.multiloop_b + em.au_gu_penalty(a, b)
                );
            }
        }
    }

    #[test]
    fn test_fast_two_loop_agrees() {
        let em = EnergyModel::random(9);
        let r = Primary::try_from("GCGAAAGCGAAACGC").unwrap();
        // Stack, bulge and internal shapes.
        for &(ost, oen, ist, ien) in &[(0, 14, 1, 13), (0, 14, 2, 13), (0, 14, 2, 11)] {
            assert_eq!(
                fast_two_loop(&em, &r, ost, oen, ist, ien),
                em.two_loop(&r, ost as usize, oen as usize, ist as usize, ien as usize)
            );
        }
    }
}
