// Owner of every entity in the level

use glam::Vec2;
use log::{debug, info, warn};

use crate::engine::input::PlayerInput;
use crate::game::host::{BodyRef, PhysicsHost};

use super::character::DamageOutcome;
use super::enemy::{self, ContactOutcome};
use super::entity::{Entity, EntityId, EntityKind};
use super::player;
use super::stats::{
    CharacterStats, ConfigError, EnemyStats, FlightConfig, PatrolConfig, PlayerStats,
};

/// Spawns, updates and removes entities, and routes contacts between them
#[derive(Debug, Default)]
pub struct EntityManager {
    entities: Vec<Entity>,
    next_id: EntityId,
}

impl EntityManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn insert(&mut self, build: impl FnOnce(EntityId) -> Entity) -> EntityId {
        let id = self.next_id;
        self.next_id += 1;

        let entity = build(id);
        info!("Spawned {:?} '{}' (id {})", entity.kind(), entity.name, id);
        self.entities.push(entity);
        id
    }

    /// Spawn the player on an existing body
    pub fn spawn_player(
        &mut self,
        name: &str,
        body: BodyRef,
        stats: CharacterStats,
        player_stats: PlayerStats,
    ) -> Result<EntityId, ConfigError> {
        stats.validate()?;
        player_stats.validate()?;

        Ok(self.insert(|id| Entity::player(id, name, body, stats, player_stats)))
    }

    /// Spawn a patrolling ground enemy on an existing body
    pub fn spawn_ground_enemy(
        &mut self,
        name: &str,
        body: BodyRef,
        stats: CharacterStats,
        enemy_stats: EnemyStats,
        patrol: PatrolConfig,
    ) -> Result<EntityId, ConfigError> {
        stats.validate()?;
        enemy_stats.validate()?;
        if patrol.left_boundary.is_none() || patrol.right_boundary.is_none() {
            warn!(
                "Ground enemy '{}' is missing a patrol boundary and will stand still",
                name
            );
        }

        Ok(self.insert(|id| {
            Entity::ground_enemy(id, name, body, stats, enemy_stats, patrol)
        }))
    }

    /// Spawn a flying enemy on an existing body. Gravity is switched off for it.
    pub fn spawn_flying_enemy(
        &mut self,
        host: &mut dyn PhysicsHost,
        name: &str,
        body: BodyRef,
        stats: CharacterStats,
        enemy_stats: EnemyStats,
        flight: FlightConfig,
    ) -> Result<EntityId, ConfigError> {
        stats.validate()?;
        enemy_stats.validate()?;
        flight.validate()?;
        if flight.point_a.is_none() || flight.point_b.is_none() {
            warn!("Flying enemy '{}' is missing a waypoint and will hover", name);
        }

        host.set_gravity_scale(body, 0.0);
        Ok(self.insert(|id| {
            Entity::flying_enemy(id, name, body, stats, enemy_stats, flight)
        }))
    }

    /// Get an entity by ID
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.iter().find(|e| e.id == id)
    }

    /// Get a mutable entity by ID
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.iter_mut().find(|e| e.id == id)
    }

    /// The player, while it is still in the level
    pub fn player(&self) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|e| e.kind() == EntityKind::Player)
    }

    pub fn all(&self) -> &[Entity] {
        &self.entities
    }

    pub fn count(&self) -> usize {
        self.entities.len()
    }

    pub fn alive_count(&self) -> usize {
        self.entities.iter().filter(|e| !e.is_dead()).count()
    }

    /// Feed this frame's input to every player: movement intent, and a jump on the rising edge
    pub fn apply_player_input(&mut self, host: &mut dyn PhysicsHost, input: &PlayerInput) {
        let intent = input.move_intent();
        let jump = input.jump_pressed();

        for entity in self
            .entities
            .iter_mut()
            .filter(|e| e.kind() == EntityKind::Player)
        {
            player::set_move_input(entity, intent);
            if jump && player::try_jump(entity, host) {
                debug!("{} jumped", entity.name);
            }
        }
    }

    /// Frame cadence: timers, probes, animation. Returns the IDs removed this frame.
    pub fn frame_update(
        &mut self,
        host: &mut dyn PhysicsHost,
        now: f32,
        dt: f32,
    ) -> Vec<EntityId> {
        for entity in &mut self.entities {
            entity.frame_update(host, now, dt);
        }

        let mut removed = Vec::new();
        self.entities.retain(|entity| {
            if !entity.is_due_for_removal(now) {
                return true;
            }
            host.despawn(entity.body);
            info!("Removed '{}' (id {})", entity.name, entity.id);
            removed.push(entity.id);
            false
        });
        removed
    }

    /// Physics cadence: movement decisions
    pub fn fixed_update(&mut self, host: &mut dyn PhysicsHost, now: f32) {
        for entity in &mut self.entities {
            entity.fixed_update(host, now);
        }
    }

    /// Collect and clear every entity's fired animation triggers
    pub fn drain_animation_triggers(&mut self) -> Vec<(EntityId, &'static str)> {
        self.entities
            .iter_mut()
            .flat_map(|entity| {
                let id = entity.id;
                entity
                    .animator
                    .drain_triggers()
                    .into_iter()
                    .map(move |trigger| (id, trigger))
            })
            .collect()
    }

    /// Resolve a contact that started between two entities.
    ///
    /// `normal` is the first contact normal, pointing from `a` into `b`.
    pub fn handle_contact(
        &mut self,
        host: &mut dyn PhysicsHost,
        a: EntityId,
        b: EntityId,
        normal: Vec2,
        now: f32,
    ) -> ContactOutcome {
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return ContactOutcome::Ignored;
        };
        if ia == ib {
            return ContactOutcome::Ignored;
        }

        let kinds = (self.entities[ia].kind(), self.entities[ib].kind());
        let (enemy_index, player_index, player_to_enemy) = match kinds {
            (EntityKind::Player, kind) if kind.is_enemy() => (ib, ia, normal),
            (kind, EntityKind::Player) if kind.is_enemy() => (ia, ib, -normal),
            _ => return ContactOutcome::Ignored,
        };

        let (enemy, player) = self.pair_mut(enemy_index, player_index);
        enemy::resolve_contact(enemy, player, player_to_enemy, host, now)
    }

    /// Deal damage to an entity through its kind's damage rules
    pub fn damage(
        &mut self,
        host: &mut dyn PhysicsHost,
        id: EntityId,
        amount: i32,
        now: f32,
    ) -> Option<DamageOutcome> {
        self.get_mut(id)
            .map(|entity| entity.take_damage(host, amount, now))
    }

    /// Kill an entity outright. Returns false if it does not exist.
    pub fn kill(&mut self, host: &mut dyn PhysicsHost, id: EntityId, now: f32) -> bool {
        match self.get_mut(id) {
            Some(entity) => {
                entity.die(host, now);
                true
            }
            None => false,
        }
    }

    fn index_of(&self, id: EntityId) -> Option<usize> {
        self.entities.iter().position(|e| e.id == id)
    }

    /// Two distinct entities borrowed mutably at once
    fn pair_mut(&mut self, first: usize, second: usize) -> (&mut Entity, &mut Entity) {
        if first < second {
            let (low, high) = self.entities.split_at_mut(second);
            (&mut low[first], &mut high[0])
        } else {
            let (low, high) = self.entities.split_at_mut(first);
            (&mut high[0], &mut low[second])
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::input::Action;
    use crate::engine::physics::{presets, CollisionEvent, PhysicsWorld};
    use crate::game::characters::animation::params;
    use crate::game::characters::state::{DeathStage, PlayerPhase};
    use crate::game::testing::MockHost;

    const DT: f32 = 1.0 / 60.0;

    struct Level {
        host: MockHost,
        manager: EntityManager,
        player: EntityId,
        walker: EntityId,
    }

    fn level() -> Level {
        let mut host = MockHost::new();
        host.ground_level = Some(0.0);
        let mut manager = EntityManager::new();

        let player_body = host.add_body(Vec2::new(0.0, 0.5));
        let player = manager
            .spawn_player(
                "hero",
                player_body,
                CharacterStats::default(),
                PlayerStats::default(),
            )
            .unwrap();

        let walker_body = host.add_body(Vec2::new(1.0, 0.5));
        let walker = manager
            .spawn_ground_enemy(
                "walker",
                walker_body,
                CharacterStats::default().with_max_health(1),
                EnemyStats::default(),
                PatrolConfig::between(Vec2::new(-3.0, 0.5), Vec2::new(3.0, 0.5)),
            )
            .unwrap();

        Level {
            host,
            manager,
            player,
            walker,
        }
    }

    #[test]
    fn test_spawn_assigns_ids() {
        let level = level();
        assert_eq!(level.manager.count(), 2);
        assert_eq!(level.manager.alive_count(), 2);
        assert_ne!(level.player, level.walker);
        assert_eq!(level.manager.player().map(|p| p.id), Some(level.player));
    }

    #[test]
    fn test_spawn_rejects_invalid_stats() {
        let mut host = MockHost::new();
        let mut manager = EntityManager::new();
        let body = host.add_body(Vec2::ZERO);

        let result = manager.spawn_player(
            "ghost",
            body,
            CharacterStats::default().with_max_health(0),
            PlayerStats::default(),
        );
        assert_eq!(result, Err(ConfigError::NonPositiveHealth(0)));

        let result = manager.spawn_flying_enemy(
            &mut host,
            "bat",
            body,
            CharacterStats::default(),
            EnemyStats::default(),
            FlightConfig::between(Vec2::ZERO, Vec2::X).with_arrival_threshold(0.0),
        );
        assert!(matches!(
            result,
            Err(ConfigError::NonPositive {
                name: "arrival_threshold",
                ..
            })
        ));
        assert_eq!(manager.count(), 0);
    }

    #[test]
    fn test_flying_enemy_ignores_gravity() {
        let mut host = MockHost::new();
        let mut manager = EntityManager::new();
        let body = host.add_body(Vec2::new(0.0, 5.0));
        manager
            .spawn_flying_enemy(
                &mut host,
                "bat",
                body,
                CharacterStats::default(),
                EnemyStats::default(),
                FlightConfig::between(Vec2::new(0.0, 5.0), Vec2::new(8.0, 5.0)),
            )
            .unwrap();
        assert_eq!(host.body(body).gravity_scale, 0.0);
    }

    #[test]
    fn test_contact_normal_is_oriented_from_player() {
        let mut level = level();
        let host = &mut level.host;

        // Enemy -> player normal pointing up: the player is on top
        let outcome = level.manager.handle_contact(
            host,
            level.walker,
            level.player,
            Vec2::new(0.0, 1.0),
            0.0,
        );
        assert_eq!(outcome, ContactOutcome::Stomped);
        assert!(level.manager.get(level.walker).unwrap().is_dead());
        assert_eq!(level.manager.get(level.player).unwrap().health(), 3);
    }

    #[test]
    fn test_side_contact_from_player_side() {
        let mut level = level();
        let outcome = level.manager.handle_contact(
            &mut level.host,
            level.player,
            level.walker,
            Vec2::new(1.0, 0.0),
            0.0,
        );
        assert_eq!(
            outcome,
            ContactOutcome::ContactDamage(DamageOutcome::Survived)
        );
        assert_eq!(level.manager.get(level.player).unwrap().health(), 2);
    }

    #[test]
    fn test_contact_with_unknown_or_same_entity() {
        let mut level = level();
        let host = &mut level.host;
        assert_eq!(
            level
                .manager
                .handle_contact(host, level.player, 99, Vec2::X, 0.0),
            ContactOutcome::Ignored
        );
        assert_eq!(
            level
                .manager
                .handle_contact(host, level.walker, level.walker, Vec2::X, 0.0),
            ContactOutcome::Ignored
        );
    }

    #[test]
    fn test_player_dies_after_three_spaced_hits() {
        let mut level = level();
        let (player, walker) = (level.player, level.walker);
        let side = Vec2::new(1.0, 0.0);
        let host = &mut level.host;
        let manager = &mut level.manager;

        manager.frame_update(host, 0.0, DT);
        assert_eq!(
            manager.handle_contact(host, player, walker, side, 0.0),
            ContactOutcome::ContactDamage(DamageOutcome::Survived)
        );

        // Still invulnerable a second later
        manager.frame_update(host, 1.0, DT);
        assert_eq!(
            manager.handle_contact(host, player, walker, side, 1.0),
            ContactOutcome::ContactDamage(DamageOutcome::Ignored)
        );

        manager.frame_update(host, 2.0, DT);
        assert_eq!(
            manager.handle_contact(host, player, walker, side, 2.0),
            ContactOutcome::ContactDamage(DamageOutcome::Survived)
        );
        assert_eq!(manager.get(player).unwrap().health(), 1);

        manager.frame_update(host, 4.0, DT);
        assert_eq!(
            manager.handle_contact(host, player, walker, side, 4.0),
            ContactOutcome::ContactDamage(DamageOutcome::Lethal)
        );
        let body = manager.get(player).unwrap().body;
        assert_eq!(
            manager.get(player).unwrap().player_phase(),
            Some(PlayerPhase::Dying(DeathStage::Frozen))
        );
        assert_eq!(manager.alive_count(), 1);

        // Dead players no longer trade contacts
        assert_eq!(
            manager.handle_contact(host, player, walker, Vec2::new(0.0, -1.0), 4.1),
            ContactOutcome::Ignored
        );
        assert!(!manager.get(walker).unwrap().is_dead());

        assert!(manager.frame_update(host, 7.4, DT).is_empty());
        assert_eq!(manager.frame_update(host, 7.5, DT), vec![player]);
        assert!(manager.player().is_none());
        assert!(!host.contains(body));
    }

    #[test]
    fn test_stomp_from_engine_contacts() {
        let mut world = PhysicsWorld::new();
        let mut manager = EntityManager::new();

        let bat_body = world.spawn(
            presets::flying_enemy_body(0.0, 0.0),
            presets::enemy_collider(1.0, 1.0),
        );
        let bat = manager
            .spawn_flying_enemy(
                &mut world,
                "bat",
                bat_body,
                CharacterStats::default(),
                EnemyStats::default(),
                FlightConfig::between(Vec2::new(0.0, 0.0), Vec2::new(5.0, 0.0)),
            )
            .unwrap();
        world.set_entity_mapping(bat_body, bat);

        let player_body = world.spawn(
            presets::player_body(0.0, 2.0),
            presets::player_collider(1.0, 2.0),
        );
        let player = manager
            .spawn_player(
                "hero",
                player_body,
                CharacterStats::default().with_size(1.0, 2.0),
                PlayerStats::default(),
            )
            .unwrap();
        world.set_entity_mapping(player_body, player);

        let mut outcomes = Vec::new();
        for step in 0..120 {
            world.step();
            for event in world.collision_events() {
                if let CollisionEvent::Started {
                    collider1,
                    collider2,
                    normal: Some(normal),
                } = event
                {
                    let a = world.entity_for_collider(collider1).unwrap();
                    let b = world.entity_for_collider(collider2).unwrap();
                    let now = step as f32 * DT;
                    outcomes.push(manager.handle_contact(&mut world, a, b, normal, now));
                }
            }
            if !outcomes.is_empty() {
                break;
            }
        }

        assert_eq!(outcomes, vec![ContactOutcome::Stomped]);
        assert!(manager.get(bat).unwrap().is_dead());
        assert_eq!(manager.get(player).unwrap().health(), 3);
        assert!(world.velocity(player_body).unwrap().y > 0.0);
    }

    #[test]
    fn test_contacts_dispatched_before_the_frame_tick() {
        let mut level = level();
        let (player, walker) = (level.player, level.walker);
        let side = Vec2::new(1.0, 0.0);
        let host = &mut level.host;
        let manager = &mut level.manager;

        // Physics steps and contacts only, the frame cadence never runs
        assert_eq!(
            manager.handle_contact(host, player, walker, side, 0.0),
            ContactOutcome::ContactDamage(DamageOutcome::Survived)
        );
        manager.fixed_update(host, 5.0);
        assert_eq!(
            manager.get(player).unwrap().player_phase(),
            Some(PlayerPhase::Normal)
        );
        assert_eq!(
            manager.handle_contact(host, player, walker, side, 5.0),
            ContactOutcome::ContactDamage(DamageOutcome::Survived)
        );
        assert_eq!(manager.get(player).unwrap().health(), 1);
    }

    #[test]
    fn test_enemy_removed_half_a_second_after_death() {
        let mut level = level();
        let walker = level.walker;
        let body = level.manager.get(walker).unwrap().body;

        assert_eq!(
            level
                .manager
                .damage(&mut level.host, walker, 1, 1.0),
            Some(DamageOutcome::Lethal)
        );
        assert!(level.manager.frame_update(&mut level.host, 1.4, DT).is_empty());
        assert!(level.host.contains(body));

        assert_eq!(
            level.manager.frame_update(&mut level.host, 1.5, DT),
            vec![walker]
        );
        assert!(level.manager.get(walker).is_none());
        assert!(!level.host.contains(body));
        assert_eq!(level.manager.count(), 1);
    }

    #[test]
    fn test_drain_animation_triggers() {
        let mut level = level();
        level.manager.kill(&mut level.host, level.walker, 0.0);

        let triggers = level.manager.drain_animation_triggers();
        assert_eq!(triggers, vec![(level.walker, params::DEATH)]);
        assert!(level.manager.drain_animation_triggers().is_empty());
    }

    #[test]
    fn test_kill_is_idempotent() {
        let mut level = level();
        assert!(level.manager.kill(&mut level.host, level.walker, 0.0));
        assert!(level.manager.kill(&mut level.host, level.walker, 0.2));
        assert_eq!(level.manager.get(level.walker).unwrap().removal_at, Some(0.5));
        assert!(!level.manager.kill(&mut level.host, 42, 0.0));
    }

    #[test]
    fn test_jump_only_on_rising_edge() {
        let mut level = level();
        let body = level.manager.get(level.player).unwrap().body;
        let mut input = PlayerInput::new();

        // Ground probe runs on the frame cadence
        level.manager.frame_update(&mut level.host, 0.0, DT);

        input.press(Action::Jump);
        level.manager.apply_player_input(&mut level.host, &input);
        assert_eq!(level.host.velocity(body).unwrap().y, 12.0);
        input.update();

        level.host.set_velocity(body, Vec2::ZERO);
        level.manager.frame_update(&mut level.host, DT, DT);
        input.press(Action::Jump);
        level.manager.apply_player_input(&mut level.host, &input);
        assert_eq!(level.host.velocity(body).unwrap().y, 0.0);
    }

    #[test]
    fn test_input_drives_player_on_physics_step() {
        let mut level = level();
        let body = level.manager.get(level.player).unwrap().body;
        let mut input = PlayerInput::new();
        input.press(Action::MoveLeft);

        level.manager.apply_player_input(&mut level.host, &input);
        level.manager.fixed_update(&mut level.host, 0.0);
        assert_eq!(level.host.velocity(body).unwrap().x, -5.0);
        assert!(level
            .manager
            .get(level.player)
            .unwrap()
            .sprite
            .scale_x
            .is_sign_positive());

        // Facing reaches the sprite on the next frame
        level.manager.frame_update(&mut level.host, 0.0, DT);
        assert_eq!(level.manager.get(level.player).unwrap().sprite.scale_x, -1.0);
    }
}
