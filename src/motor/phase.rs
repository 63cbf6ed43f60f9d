//! Four-phase energization sequence shared by the driver and the simulator.

/// Number of phase pins per motor.
pub const PHASE_COUNT: usize = 4;

/// Pin levels for one phase.
pub type PhaseRow = [bool; PHASE_COUNT];

/// Two-coils-on full-step sequence, indexed by `position % 4`.
///
/// Consecutive rows share exactly one energized coil, so the rotor always
/// has a well-defined neighbour to move towards.
pub const PHASE_TABLE: [PhaseRow; PHASE_COUNT] = [
    [true, true, false, false],
    [false, true, true, false],
    [false, false, true, true],
    [true, false, false, true],
];

/// Pin levels that hold the rotor at `position`.
#[inline]
pub fn phase_for(position: u32) -> PhaseRow {
    PHASE_TABLE[(position % PHASE_COUNT as u32) as usize]
}
