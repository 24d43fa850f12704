// Gameplay: characters and the physics seam they talk through

pub mod characters;
pub mod host;

#[cfg(test)]
pub mod testing;
