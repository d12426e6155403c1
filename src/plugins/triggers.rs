use crate::components::*;
use bevy::prelude::*;
use bevy_rapier3d::prelude::*;

/// Forwards sensor overlap-enter events to the callback stored on the trigger.
pub struct TriggerRouterPlugin;

impl Plugin for TriggerRouterPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, route_trigger_contacts);
    }
}

/// Orders a started collision pair as (trigger, other) when exactly one side is a router.
fn trigger_pair(
    first: Entity,
    second: Entity,
    routers: &Query<&TriggerRouter>,
) -> Option<(Entity, Entity)> {
    match (routers.contains(first), routers.contains(second)) {
        (true, false) => Some((first, second)),
        (false, true) => Some((second, first)),
        _ => None,
    }
}

fn route_trigger_contacts(
    mut commands: Commands,
    mut collision_events: EventReader<CollisionEvent>,
    routers: Query<&TriggerRouter>,
    players: Query<(), With<Player>>,
) {
    for event in collision_events.read() {
        // Leaving a trigger has no effect
        let CollisionEvent::Started(first, second, _) = *event else {
            continue;
        };
        let Some((trigger, other)) = trigger_pair(first, second, &routers) else {
            continue;
        };
        if !players.contains(other) {
            continue;
        }
        let Ok(router) = routers.get(trigger) else {
            continue;
        };

        debug!("{:?} trigger {trigger} entered by {other}", router.kind);
        commands.run_system_with(router.callback, TriggerContact { trigger, other });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::maze::MarkerKind;
    use bevy_rapier3d::rapier::geometry::CollisionEventFlags;

    #[derive(Resource, Default)]
    struct Contacts(Vec<TriggerContact>);

    fn record_contact(In(contact): In<TriggerContact>, mut contacts: ResMut<Contacts>) {
        contacts.0.push(contact);
    }

    fn setup_app() -> (App, Entity, Entity, Entity) {
        let mut app = App::new();
        app.add_event::<CollisionEvent>()
            .init_resource::<Contacts>()
            .add_plugins(TriggerRouterPlugin);

        let callback = app.world_mut().register_system(record_contact);
        let trigger = app
            .world_mut()
            .spawn(TriggerRouter {
                kind: MarkerKind::Goal,
                callback,
            })
            .id();
        let player = app.world_mut().spawn(Player::default()).id();
        let wall = app.world_mut().spawn_empty().id();
        (app, trigger, player, wall)
    }

    fn send(app: &mut App, event: CollisionEvent) {
        app.world_mut().send_event(event);
        app.update();
    }

    #[test]
    fn test_player_entering_trigger_runs_callback() {
        let (mut app, trigger, player, _) = setup_app();

        send(
            &mut app,
            CollisionEvent::Started(player, trigger, CollisionEventFlags::SENSOR),
        );

        let contacts = &app.world().resource::<Contacts>().0;
        assert_eq!(
            contacts,
            &vec![TriggerContact {
                trigger,
                other: player
            }]
        );
    }

    #[test]
    fn test_exit_and_non_player_contacts_are_ignored() {
        let (mut app, trigger, player, wall) = setup_app();

        send(
            &mut app,
            CollisionEvent::Stopped(trigger, player, CollisionEventFlags::SENSOR),
        );
        send(
            &mut app,
            CollisionEvent::Started(trigger, wall, CollisionEventFlags::SENSOR),
        );

        assert!(app.world().resource::<Contacts>().0.is_empty());
    }
}
