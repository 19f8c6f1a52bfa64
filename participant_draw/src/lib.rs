mod config;
pub mod builder;
pub mod manual;
pub mod schema;

use log::{debug, info};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

pub use crate::config::*;
pub use crate::schema::{canonical_field_for, denormalize, denormalize_records, normalize};

/// Runs a draw over the pool with the given rules.
///
/// Arguments:
/// * `pool` the eligible participants
/// * `rules` the number of selected participants and alternates to draw. If
/// rules contain a seed, the outcome is the same for every run with that seed.
/// Otherwise a generator is seeded from the operating system for this call only.
pub fn run_draw(pool: &[Participant], rules: &DrawRules) -> Result<DrawResult, DrawErrors> {
    info!(
        "Drawing {} selected and {} alternates out of {} participants (seeded: {})",
        rules.want_selected,
        rules.want_alternates,
        pool.len(),
        rules.seed.is_some()
    );
    let mut rng: StdRng = match rules.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    draw_with_rng(pool, rules.want_selected, rules.want_alternates, &mut rng)
}

/// The draw procedure, with the random generator provided by the caller.
///
/// The whole pool is shuffled, so that every permutation is equally likely. The
/// head of the permutation becomes the selected group, the following elements
/// the alternates. Participants beyond that are not part of the result.
pub fn draw_with_rng<R: Rng + ?Sized>(
    pool: &[Participant],
    want_selected: usize,
    want_alternates: usize,
    rng: &mut R,
) -> Result<DrawResult, DrawErrors> {
    let requested = want_selected.checked_add(want_alternates);
    match requested {
        Some(total) if total <= pool.len() => {}
        _ => {
            return Err(DrawErrors::InsufficientParticipants {
                available: pool.len(),
                requested: requested.unwrap_or(usize::MAX),
            });
        }
    }

    let mut permutation: Vec<Participant> = pool.to_vec();
    permutation.shuffle(rng);

    let discarded = permutation.len() - want_selected - want_alternates;
    permutation.truncate(want_selected + want_alternates);
    let alternates = permutation.split_off(want_selected);
    let selected = permutation;
    debug!(
        "draw_with_rng: selected: {:?} alternates: {:?} not drawn: {}",
        selected.len(),
        alternates.len(),
        discarded
    );
    Ok(DrawResult {
        selected,
        alternates,
        want_selected,
        want_alternates,
    })
}

/// Parses a count typed by a user, such as the number of alternates.
pub fn parse_count(label: &str, value: &str) -> Result<usize, DrawErrors> {
    let trimmed = value.trim();
    // usize parsing accepts a leading '+', which is not a well-formed count here.
    if trimmed.is_empty() || !trimmed.chars().all(|c| c.is_ascii_digit()) {
        return Err(DrawErrors::InvalidCount {
            label: label.to_string(),
            value: value.to_string(),
        });
    }
    trimmed
        .parse::<usize>()
        .map_err(|_| DrawErrors::InvalidCount {
            label: label.to_string(),
            value: value.to_string(),
        })
}
