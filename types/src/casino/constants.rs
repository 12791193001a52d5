/// Number of faces on each die
pub const DIE_FACES: u8 = 6;

/// Come-out totals that win immediately for the player
pub const NATURALS: [u8; 2] = [7, 11];

/// Come-out totals that win immediately for the house
pub const CRAPS: [u8; 3] = [2, 3, 12];

/// Totals that establish a point on the come-out roll
pub const POINT_NUMBERS: [u8; 6] = [4, 5, 6, 8, 9, 10];

/// Total that ends the point phase in favor of the house
pub const SEVEN_OUT: u8 = 7;

/// Winning a bet returns the stake plus equal winnings (1:1)
pub const WIN_RETURN_MULTIPLIER: u64 = 2;

/// Message carried by a rejected bank balance
pub const NEGATIVE_AMOUNT_MESSAGE: &str = "only non-negative amounts allowed";
