//! Cosmetic tail wave.
//!
//! The trailing points of an agent's path follow the head like a damped
//! spring with a sine wave travelling down the tail. Nothing here feeds back
//! into head kinematics or fitness, so a renderer can run it on its own copy
//! of a path just as well as the simulation can.

use shared::Point;

/// Lay the tail out behind a head that just moved by `displacement`.
///
/// `path[0]` must already hold the new head position. `phase` is the running
/// wave counter kept per agent; it advances once per tail segment.
pub fn follow_through(path: &mut [Point], displacement: Point, phase: &mut f64) {
    let mut direction = displacement;
    let mut speed = direction.length();
    if !(speed > 0.0 && speed.is_finite()) {
        return;
    }

    let phase_step = speed * 10.0;
    let spring = -5.0 - speed / 3.0;
    let mut cursor = path[0];

    for j in 1..path.len() {
        if !(speed > 0.0 && speed.is_finite()) {
            break;
        }

        let offset = cursor - path[j];
        *phase += phase_step;
        let lateral = ((*phase + j as f64 * 3.0) / 300.0).sin() / speed;

        cursor.x += direction.x / speed * spring;
        cursor.y += direction.y / speed * spring;
        path[j] = Point::new(
            cursor.x - direction.y * lateral,
            cursor.y + direction.x * lateral,
        );

        direction = offset;
        speed = offset.length();
    }
}
