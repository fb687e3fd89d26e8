mod geometry;
mod settings;
