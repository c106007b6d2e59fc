pub mod number_theory;

pub use number_theory::{
    euler_phi, is_generator, is_prime, is_primitive_root, mod_pow, multiplicative_order,
    prime_factors,
};
