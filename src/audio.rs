//! Sound cues requested by the simulation
//!
//! The simulation never plays audio itself. It emits `SoundEvent`s and the
//! audio collaborator maps them to loaded clips.

/// Sound effect types, tagged by cause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundEvent {
    /// Player fired
    PlayerAttack,
    /// Enemy projectile hit the player
    PlayerHit,
    /// That hit was fatal
    PlayerDeath,
    /// Player projectile hit an enemy
    EnemyHit,
    /// Close-combat volley
    EnemyAttackMelee,
    /// Ranged shot
    EnemyAttackRanged,
}

impl SoundEvent {
    pub const ALL: [SoundEvent; 6] = [
        SoundEvent::PlayerAttack,
        SoundEvent::PlayerHit,
        SoundEvent::PlayerDeath,
        SoundEvent::EnemyHit,
        SoundEvent::EnemyAttackMelee,
        SoundEvent::EnemyAttackRanged,
    ];

    /// Clip file name under the audio asset directory
    pub fn asset_name(&self) -> &'static str {
        match self {
            SoundEvent::PlayerAttack => "rifle.wav",
            SoundEvent::PlayerHit => "impact1.wav",
            SoundEvent::PlayerDeath => "death.mp3",
            SoundEvent::EnemyHit => "impact2.wav",
            SoundEvent::EnemyAttackMelee => "shotgun.wav",
            SoundEvent::EnemyAttackRanged => "sniper.wav",
        }
    }

    /// Playback volume (0.0 - 1.0)
    pub fn volume(&self) -> f32 {
        match self {
            // Rapid-fire clips are mixed down
            SoundEvent::PlayerAttack | SoundEvent::EnemyAttackMelee => 0.5,
            _ => 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_cue_has_a_clip() {
        for event in SoundEvent::ALL {
            assert!(!event.asset_name().is_empty());
            assert!((0.0..=1.0).contains(&event.volume()));
        }
        assert_eq!(SoundEvent::EnemyAttackMelee.volume(), 0.5);
        assert_eq!(SoundEvent::PlayerDeath.asset_name(), "death.mp3");
    }
}
