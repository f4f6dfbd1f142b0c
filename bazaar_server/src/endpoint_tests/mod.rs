mod helpers;
mod mocks;

mod cart;
mod catalog;
mod orders;
