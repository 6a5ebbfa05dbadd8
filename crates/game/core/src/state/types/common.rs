use std::fmt;

/// Unique identifier for any creature known to the world (characters,
/// monsters, summons, NPCs).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CreatureId(pub u32);

impl fmt::Display for CreatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Tile coordinate with floor index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Position {
    pub x: i32,
    pub y: i32,
    pub z: u8,
}

impl Position {
    pub const fn new(x: i32, y: i32, z: u8) -> Self {
        Self { x, y, z }
    }

    /// Returns the position shifted by `(dx, dy)` on the same floor.
    pub const fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            z: self.z,
        }
    }

    /// Iterates the eight tiles surrounding this one, row by row.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        (-1..=1)
            .flat_map(|dy| (-1..=1).map(move |dx| (dx, dy)))
            .filter(|&(dx, dy)| dx != 0 || dy != 0)
            .map(move |(dx, dy)| self.offset(dx, dy))
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

/// Monotonic clock sample in milliseconds.
///
/// The host samples its clock once per tick and passes the value down; every
/// timer in this crate is an absolute deadline compared against it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Timestamp(pub u64);

impl Timestamp {
    pub const ZERO: Self = Self(0);

    pub fn new(millis: u64) -> Self {
        Self(millis)
    }

    /// Milliseconds elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn since(self, earlier: Timestamp) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

impl std::ops::Add<u64> for Timestamp {
    type Output = Timestamp;
    fn add(self, rhs: u64) -> Timestamp {
        Timestamp(self.0.saturating_add(rhs))
    }
}

impl std::ops::Sub<u64> for Timestamp {
    type Output = Timestamp;
    fn sub(self, rhs: u64) -> Timestamp {
        Timestamp(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}

/// Integer resource meter (health, mana) tracked per character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResourceMeter {
    pub current: u32,
    pub maximum: u32,
}

impl ResourceMeter {
    pub fn new(current: u32, maximum: u32) -> Self {
        Self {
            current: current.min(maximum),
            maximum,
        }
    }

    pub fn full(maximum: u32) -> Self {
        Self {
            current: maximum,
            maximum,
        }
    }

    pub fn refill(&mut self) {
        self.current = self.maximum;
    }

    /// Raises both values by `amount`.
    pub fn grow(&mut self, amount: u32) {
        self.maximum = self.maximum.saturating_add(amount);
        self.current = self.current.saturating_add(amount);
    }

    /// Lowers the maximum by `amount` (floored at zero) and clamps current.
    pub fn shrink(&mut self, amount: u32) {
        self.maximum = self.maximum.saturating_sub(amount);
        self.current = self.current.min(self.maximum);
    }

    pub fn set_current(&mut self, value: u32) {
        self.current = value.min(self.maximum);
    }

    /// Current value as a percentage of the maximum, 0 when the maximum is 0.
    pub fn percent(&self) -> u32 {
        if self.maximum == 0 {
            return 0;
        }
        ((u64::from(self.current) * 100) / u64::from(self.maximum)) as u32
    }
}
