mod fixtures;

mod describing;
mod properties;
mod scenarios;
mod threads;
