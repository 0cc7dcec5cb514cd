//! Role dealing: builds the role pool for the chosen team sizes and shuffles it
//! across the player slots.

use std::time::{SystemTime, UNIX_EPOCH};

use rand::{
    Rng, SeedableRng, TryRngCore,
    rngs::{OsRng, StdRng},
    seq::SliceRandom,
};
use tracing::warn;

use crate::state::game::{Player, Role};

/// Build the role pool for `red` and `black` players and shuffle it uniformly.
pub fn assign_roles(red: u32, black: u32) -> Vec<Role> {
    let mut rng = dealing_rng();
    assign_roles_with(red, black, &mut rng)
}

/// Same as [`assign_roles`] with a caller-provided generator.
pub fn assign_roles_with<R>(red: u32, black: u32, rng: &mut R) -> Vec<Role>
where
    R: Rng + ?Sized,
{
    let mut roles = Vec::with_capacity((red + black) as usize);

    if black > 0 {
        roles.push(Role::Don);
        roles.extend(std::iter::repeat_n(Role::Black, (black - 1) as usize));
    }

    if red > 0 {
        roles.push(Role::Sheriff);
        roles.extend(std::iter::repeat_n(Role::Red, (red - 1) as usize));
    }

    // Fisher-Yates over the pool; slots keep their order.
    roles.shuffle(rng);
    roles
}

/// Deal a fresh table: slots `1..=red+black` in order, each with a shuffled role.
pub fn create_players(red: u32, black: u32) -> Vec<Player> {
    let mut rng = dealing_rng();
    create_players_with(red, black, &mut rng)
}

/// Same as [`create_players`] with a caller-provided generator.
pub fn create_players_with<R>(red: u32, black: u32, rng: &mut R) -> Vec<Player>
where
    R: Rng + ?Sized,
{
    assign_roles_with(red, black, rng)
        .into_iter()
        .zip(1..)
        .map(|(role, id)| Player::new(id, role))
        .collect()
}

/// Generator seeded from the OS entropy source, or from the clock when the OS
/// source cannot be read.
fn dealing_rng() -> StdRng {
    let mut seed = <StdRng as SeedableRng>::Seed::default();
    match OsRng.try_fill_bytes(&mut seed) {
        Ok(()) => StdRng::from_seed(seed),
        Err(err) => {
            warn!(error = %err, "OS entropy unavailable; dealing roles with a clock-seeded generator");
            let nanos = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|elapsed| elapsed.as_nanos() as u64)
                .unwrap_or_default();
            StdRng::seed_from_u64(nanos ^ u64::from(std::process::id()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn count(roles: &[Role], role: Role) -> usize {
        roles.iter().filter(|candidate| **candidate == role).count()
    }

    #[test]
    fn role_counts_match_team_sizes() {
        let mut rng = StdRng::seed_from_u64(7);
        for red in 0..=20u32 {
            for black in 0..=20u32 {
                let roles = assign_roles_with(red, black, &mut rng);
                assert_eq!(roles.len(), (red + black) as usize);
                assert_eq!(count(&roles, Role::Don), usize::from(black >= 1));
                assert_eq!(count(&roles, Role::Sheriff), usize::from(red >= 1));
                assert_eq!(count(&roles, Role::Black), black.saturating_sub(1) as usize);
                assert_eq!(count(&roles, Role::Red), red.saturating_sub(1) as usize);
            }
        }
    }

    #[test]
    fn empty_teams_produce_no_roles() {
        assert!(assign_roles(0, 0).is_empty());
        assert_eq!(assign_roles(0, 3).iter().filter(|r| r.is_red()).count(), 0);
        assert_eq!(assign_roles(4, 0).iter().filter(|r| !r.is_red()).count(), 0);
    }

    #[test]
    fn players_are_numbered_in_slot_order() {
        let players = create_players(7, 3);
        let ids: Vec<u32> = players.iter().map(|player| player.id).collect();
        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert!(players.iter().all(|player| {
            player.warnings == 0 && !player.has_viewed_role && !player.is_eliminated
        }));
    }

    #[test]
    fn shuffle_spreads_the_don_over_every_slot() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut hits = [0usize; 3];
        for _ in 0..6_000 {
            let roles = assign_roles_with(2, 1, &mut rng);
            let slot = roles
                .iter()
                .position(|role| *role == Role::Don)
                .expect("one don per deal");
            hits[slot] += 1;
        }
        for slot_hits in hits {
            assert!((1_700..=2_300).contains(&slot_hits), "skewed: {hits:?}");
        }
    }
}
