use crate::agent::{random_display_tag, Agent};
use crate::arena::Arena;
use shared::{mutate_value, GeneBounds, Point, RandomSource};
use tracing::debug;

/// Bounds for a birthplace inherited from the best parent.
pub const INHERITED_SPAWN: GeneBounds = GeneBounds::new(1.0, 150.0);

/// Slots picked out of a death batch for one reproduction event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Fittest member of the batch
    pub parent1: usize,
    /// Fittest member other than `parent1`
    pub parent2: usize,
    /// Least fit member once both parents are set aside; the slot to recycle
    pub child: usize,
}

/// Record of one successful reproduction event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReproductionEvent {
    pub selection: Selection,
    /// Generation of the reborn slot after the event
    pub generation: u32,
    /// Whether the newborn started near `parent1`'s birthplace
    pub inherited_position: bool,
    pub position: Point,
}

/// Crossover and mutation knobs supplied by the host
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BreedingParams {
    pub mutation_rate: f64,
    pub elitism_bias: f64,
}

/// Pick both parents and the slot to recycle from a batch of dead slots.
///
/// Lower fitness is better. Ties go to whoever appears first in the batch,
/// both for the best and the worst picks. Members beyond these three are
/// ignored. Returns `None` when the batch has fewer than three members or
/// when no comparable fitness exists.
pub fn select(batch: &[usize], agents: &[Agent]) -> Option<Selection> {
    if batch.len() < 3 {
        return None;
    }

    let fitness = |slot: usize| agents[slot].fitness;

    let mut parent1: Option<usize> = None;
    for &slot in batch {
        if parent1.map_or(true, |best| fitness(slot) < fitness(best)) && !fitness(slot).is_nan() {
            parent1 = Some(slot);
        }
    }
    let parent1 = parent1?;

    let mut parent2: Option<usize> = None;
    for &slot in batch {
        if slot == parent1 || fitness(slot).is_nan() {
            continue;
        }
        if parent2.map_or(true, |best| fitness(slot) < fitness(best)) {
            parent2 = Some(slot);
        }
    }
    let parent2 = parent2?;

    let mut child: Option<usize> = None;
    for &slot in batch {
        if slot == parent1 || slot == parent2 {
            continue;
        }
        if child.map_or(true, |worst| fitness(slot) > fitness(worst) || fitness(worst).is_nan()) {
            child = Some(slot);
        }
    }

    child.map(|child| Selection {
        parent1,
        parent2,
        child,
    })
}

/// Breed `parent1` and `parent2` into the `child` slot.
///
/// Genes come from uniform crossover followed by bounded mutation. The
/// newborn starts near `parent1`'s birthplace with probability
/// `elitism_bias`, otherwise at a fresh spot near the start edge.
pub fn reproduce<R: RandomSource + ?Sized>(
    agents: &mut [Agent],
    selection: Selection,
    params: BreedingParams,
    arena: &Arena,
    rng: &mut R,
) -> ReproductionEvent {
    let parent1 = &agents[selection.parent1];
    let parent2 = &agents[selection.parent2];

    let mut genome = parent1
        .genome
        .crossover(&parent2.genome, params.elitism_bias, rng);
    genome.mutate(params.mutation_rate, rng);

    let inherited_position = rng.uniform() < params.elitism_bias;
    let position = if inherited_position {
        let origin = parent1.birthplace;
        let x = mutate_value(origin.x, params.mutation_rate, INHERITED_SPAWN, rng);
        let y = mutate_value(origin.y, params.mutation_rate, INHERITED_SPAWN, rng);
        Point::new(x, y)
    } else {
        arena.rebirth_point(rng)
    };

    let display_tag = random_display_tag(rng);
    let child = &mut agents[selection.child];
    child.rebirth(genome, position, arena, display_tag);

    debug!(
        parent1 = selection.parent1,
        parent2 = selection.parent2,
        child = selection.child,
        generation = child.generation,
        tail_strength = child.genome.tail_strength,
        "reborn"
    );

    ReproductionEvent {
        selection,
        generation: child.generation,
        inherited_position,
        position,
    }
}
