//! Passkey Pilot demo binary
//!
//! Walks one full passkey lifecycle against the simulated authenticator:
//! registration, metadata display, then verification against the stored
//! credential reference. Every printed field is decoded from the same CBOR
//! and packed-binary buffers a real platform authenticator would return.

use passkey_pilot::ceremony::{CeremonyEngine, MemoryStore, SimulatedAuthenticator};
use passkey_pilot::{
    AttestationRecord, RegistrationStatus, SimulatorSettings, VerificationStatus, VERSION,
};

fn not_available<T: ToString>(value: Option<T>) -> String {
    value.map_or_else(|| "not available".to_string(), |v| v.to_string())
}

fn print_attestation(record: &AttestationRecord) {
    println!("  attachment:        {}", record.authenticator_attachment);
    println!("  transports:        {}", record.transports.join(", "));
    println!("  hardware:          {}", record.hardware_type);
    println!("  attestation fmt:   {}", record.attestation_format);
    println!("  algorithm:         {}", not_available(record.algorithm.clone()));
    println!(
        "  user verification: {}",
        not_available(record.user_verification)
    );
    println!("  sign count:        {}", not_available(record.sign_count));
    println!("  aaguid:            {}", not_available(record.aaguid.clone()));
    println!(
        "  backed up:         {}",
        not_available(record.backup_state)
    );
    println!("  origin:            {}", record.origin);
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let settings = SimulatorSettings::load()?;
    settings.init_logging();

    println!("Passkey Pilot v{VERSION}");
    println!(
        "Relying party: {} ({})",
        settings.relying_party.name, settings.relying_party.id
    );
    println!();

    let mut engine = CeremonyEngine::new(
        SimulatedAuthenticator::new(),
        MemoryStore::new(),
        settings,
    );

    println!("→ Registering a passkey...");
    if engine.register() != RegistrationStatus::Success {
        let message = engine
            .registration()
            .error_message()
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(message.into());
    }
    let registration = engine.registration();
    println!(
        "✓ Registered credential {}",
        registration.credential_id().unwrap_or_default()
    );
    if let Some(record) = registration.record() {
        print_attestation(record);
    }
    println!();

    println!("→ Verifying with the stored passkey...");
    if engine.verify() != VerificationStatus::Authenticated {
        let message = engine
            .verification()
            .error_message()
            .unwrap_or_else(|| "unknown error".to_string());
        return Err(message.into());
    }
    if let Some(record) = engine.verification().record() {
        println!("✓ Authenticated");
        println!("  sign count:        {}", not_available(record.sign_count));
        println!(
            "  user verification: {}",
            not_available(record.user_verification)
        );
        println!("  signature length:  {} bytes", record.signature_length);
        println!("  origin:            {}", record.origin);
    }

    Ok(())
}
