//! # modres-algebra
//!
//! Basic algebras of modular group algebras `F_p G` for finite p-groups.
//!
//! A basic algebra is described by its nontip monomials (paths in a quiver
//! with one vertex), the tree they form under right extension by arrows,
//! and the matrices of right multiplication by each arrow. This crate
//! provides:
//!
//! - [`Group`]: the immutable algebra context every Buchberger run reads
//! - [`PathOrdering`]: reverse length-lex, length-lex and Jennings orders
//! - `.nontips` / `.dims` readers and writers
//! - [`AlgebraBuilder`]: computing the basic algebra from permutation
//!   generators, with a catalogue of [`small_groups`]

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod builder;
pub mod error;
pub mod group;
pub mod loader;
pub mod ordering;
pub mod path;
pub mod small_groups;

pub use builder::AlgebraBuilder;
pub use error::{ErrorKind, GroupError};
pub use group::Group;
pub use loader::{
    load_dimensions, load_group, open_header, read_group, read_header, save_group, stem_path,
    write_dimensions, write_group, write_header, Header, MAX_NONTIPS,
};
pub use ordering::PathOrdering;
pub use path::{PathNode, PathTree, Word};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nontips_round_trip_through_bytes() {
        let group = small_groups::quaternion_8()
            .builder()
            .with_ordering(PathOrdering::LengthLex)
            .build()
            .unwrap();
        let mut bytes = Vec::new();
        write_group(&mut bytes, &group).unwrap();
        let back = read_group(&mut bytes.as_slice(), &[]).unwrap();
        assert_eq!(Header::of(&back), Header::of(&group));
        assert_eq!(back.paths(), group.paths());
        for a in 0..group.arrows() {
            assert_eq!(back.action(a), group.action(a));
        }
    }

    #[test]
    fn test_jennings_needs_dimensions() {
        let group = small_groups::elementary_abelian(3, 2)
            .builder()
            .with_ordering(PathOrdering::Jennings)
            .build()
            .unwrap();
        let mut bytes = Vec::new();
        write_group(&mut bytes, &group).unwrap();
        assert!(read_group(&mut bytes.as_slice(), &[]).is_err());
        assert!(read_group(&mut bytes.as_slice(), &[1, 1]).is_ok());
    }
}
