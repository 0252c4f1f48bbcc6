//! Authoritative unit state owned by the world.

use dungeon_delve_core::{
    BossSnapshot, CellCoord, EnemyId, EnemySnapshot, Health, PlayerSnapshot, Strength,
};

/// Mutable state of the player-controlled unit.
#[derive(Clone, Debug)]
pub(crate) struct PlayerState {
    pub(crate) cell: CellCoord,
    pub(crate) health: Health,
    pub(crate) health_prev: Health,
    pub(crate) strength: Strength,
    pub(crate) strength_prev: Strength,
    pub(crate) attacking: bool,
    pub(crate) attacking_prev: bool,
    pub(crate) moved: bool,
}

impl PlayerState {
    pub(crate) fn spawned_at(cell: CellCoord) -> Self {
        Self {
            cell,
            health: Health::FULL,
            health_prev: Health::FULL,
            strength: Strength::NONE,
            strength_prev: Strength::NONE,
            attacking: false,
            attacking_prev: false,
            moved: false,
        }
    }

    pub(crate) fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            cell: self.cell,
            health: self.health,
            health_prev: self.health_prev,
            strength: self.strength,
            strength_prev: self.strength_prev,
            attacking: self.attacking,
            attacking_prev: self.attacking_prev,
            moved: self.moved,
        }
    }

    pub(crate) fn commit(&mut self) {
        self.health_prev = self.health;
        self.strength_prev = self.strength;
        self.attacking_prev = self.attacking;
        self.attacking = false;
        self.moved = false;
    }
}

/// Mutable state of a single hostile unit.
#[derive(Clone, Debug)]
pub(crate) struct EnemyState {
    pub(crate) id: EnemyId,
    pub(crate) cell: CellCoord,
    pub(crate) health: Health,
    pub(crate) health_prev: Health,
    pub(crate) attacking: bool,
    pub(crate) attacking_prev: bool,
}

impl EnemyState {
    pub(crate) fn spawned_at(id: EnemyId, cell: CellCoord) -> Self {
        Self {
            id,
            cell,
            health: Health::FULL,
            health_prev: Health::FULL,
            attacking: false,
            attacking_prev: false,
        }
    }

    pub(crate) fn snapshot(&self) -> EnemySnapshot {
        EnemySnapshot {
            id: self.id,
            cell: self.cell,
            health: self.health,
            health_prev: self.health_prev,
            attacking: self.attacking,
            attacking_prev: self.attacking_prev,
        }
    }

    pub(crate) fn commit(&mut self) {
        self.health_prev = self.health;
        self.attacking_prev = self.attacking;
        self.attacking = false;
    }
}

/// Mutable state of the boss while it remains alive.
#[derive(Clone, Debug)]
pub(crate) struct BossState {
    pub(crate) cell: CellCoord,
    pub(crate) health: Health,
    pub(crate) health_prev: Health,
    pub(crate) attacking: bool,
    pub(crate) attacking_prev: bool,
}

impl BossState {
    pub(crate) fn spawned_at(cell: CellCoord) -> Self {
        Self {
            cell,
            health: Health::FULL,
            health_prev: Health::FULL,
            attacking: false,
            attacking_prev: false,
        }
    }

    pub(crate) fn snapshot(&self) -> BossSnapshot {
        BossSnapshot {
            cell: self.cell,
            health: self.health,
            health_prev: self.health_prev,
            attacking: self.attacking,
            attacking_prev: self.attacking_prev,
        }
    }

    pub(crate) fn commit(&mut self) {
        self.health_prev = self.health;
        self.attacking_prev = self.attacking;
        self.attacking = false;
    }
}
