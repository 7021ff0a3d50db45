#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(missing_docs)]

//! Multiparty FHEW bootstrapping.
//!
//! The crate builds a DM style bootstrapping key out of gadget (RGSW) ciphertexts, either
//! by a single key holder or jointly by several parties that rotate a shared key one after
//! another, and uses it to evaluate binary gates on LWE encrypted bits.

mod accumulator;
mod automorphism;
mod bootstrap;
mod bootstrapping_key;
mod crs;
mod error;
mod gadget_key;
mod lwe;
mod multiparty;
mod parameter;
mod rotator;
mod secret_key;
mod threshold;

pub use accumulator::{Accumulator, AccumulatorSpace};
pub use automorphism::{
    automorphism_degree, AutomorphismKey, AutomorphismKeyAssembler, AUTOMORPHISM_GENERATOR,
};
pub use bootstrap::{BinaryGate, Evaluator, RefreshedCiphertext};
pub use bootstrapping_key::BootstrappingKey;
pub use crs::{CommonRandomness, CrsSlot};
pub use error::FhewError;
pub use gadget_key::GadgetKeyBuilder;
pub use lwe::{decode, encode, LweCiphertext};
pub use multiparty::{
    aggregate, AssemblyState, JointPublicKey, MultipartyKeyAssembler, PublicKeyShare, RgswShare,
};
pub use parameter::{
    ConstParameters, NoiseMode, Parameters, SecretDistribution, MEDIUM_PARAMETERS,
    TOY_PARAMETERS,
};
pub use rotator::HomomorphicRotator;
pub use secret_key::{LweSecretKey, PartySecret, RingSecretKey};
pub use threshold::{fuse_partial_decryptions, partial_decrypt_lead, partial_decrypt_main};
