pub mod maybe;
