use rand::Rng;

/// Word pool for match display names.
pub const NAME_POOL: &[&str] = &[
    "Time", "Past", "Future", "Dev", "Fly", "Flying", "Soar", "Soaring", "Power", "Falling",
    "Fall", "Jump", "Cliff", "Mountain", "Rend", "Red", "Blue", "Green", "Yellow", "Gold",
    "Demon", "Demonic", "Panda", "Cat", "Kitty", "Kitten", "Zero", "Memory", "Trooper", "XX",
    "Bandit", "Fear", "Light", "Glow", "Tread", "Deep", "Deeper", "Deepest", "Mine", "Your",
    "Worst", "Enemy", "Hostile", "Force", "Video", "Game", "Donkey", "Mule", "Colt", "Cult",
    "Cultist", "Magnum", "Gun", "Assault", "Recon", "Trap", "Trapper", "Redeem", "Code",
    "Script", "Writer", "Near", "Close", "Open", "Cube", "Circle", "Geo", "Genome", "Germ",
    "Spaz", "Shot", "Echo", "Beta", "Alpha", "Gamma", "Omega", "Seal", "Squid", "Money",
    "Cash", "Lord", "King", "Duke", "Rest", "Fire", "Flame", "Morrow", "Break", "Breaker",
    "Numb", "Ice", "Cold", "Rotten", "Sick", "Sickly", "Janitor", "Camel", "Rooster", "Sand",
    "Desert", "Dessert", "Hurdle", "Racer", "Eraser", "Erase", "Big", "Small", "Short", "Tall",
    "Sith", "Bounty", "Hunter", "Cracked", "Broken", "Sad", "Happy", "Joy", "Joyful",
    "Crimson", "Destiny", "Deceit", "Lies", "Lie", "Honest", "Destined", "Bloxxer", "Hawk",
    "Eagle", "Hawker", "Walker", "Zombie", "Sarge", "Capt", "Captain", "Punch", "One", "Two",
    "Uno", "Slice", "Slash", "Melt", "Melted", "Melting", "Fell", "Wolf", "Hound", "Legacy",
    "Sharp", "Dead", "Mew", "Chuckle", "Bubba", "Bubble", "Sandwich", "Smasher", "Extreme",
    "Multi", "Universe", "Ultimate", "Death", "Ready", "Monkey", "Elevator", "Wrench",
    "Grease", "Head", "Theme", "Grand", "Cool", "Kid", "Boy", "Girl", "Vortex", "Paradox",
];

/// Draws two words from [`NAME_POOL`] (independently, repeats allowed) and
/// joins them with a space.
///
/// The caller supplies the random source, so a seeded RNG yields a
/// reproducible name.
///
/// ```
/// use noughts_engine::names::pick_name;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha20Rng;
///
/// let a = pick_name(&mut ChaCha20Rng::seed_from_u64(7));
/// let b = pick_name(&mut ChaCha20Rng::seed_from_u64(7));
/// assert_eq!(a, b);
/// assert_eq!(a.split(' ').count(), 2);
/// ```
pub fn pick_name<R: Rng + ?Sized>(rng: &mut R) -> String {
    let first = NAME_POOL[rng.random_range(0..NAME_POOL.len())];
    let second = NAME_POOL[rng.random_range(0..NAME_POOL.len())];
    format!("{first} {second}")
}
