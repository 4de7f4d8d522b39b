//! MXCSR control/status word decoding.
//!
//! RandomX virtual-machine loops run the SSE unit with a rounding mode other
//! than the default round-to-nearest, so a saved FPU state whose
//! rounding-control field is non-zero is treated as a miner workload
//! signature. The extraction is kept bit-exact; it carries no false-positive
//! suppression and no rate limiting.

/// Rounding-control field of MXCSR, bits 13..=14.
pub const MXCSR_RC_MASK: u32 = 0x6000;
pub const MXCSR_RC_SHIFT: u32 = 13;

/// Extracts the 2-bit rounding-control field.
pub fn rounding_control(mxcsr: u32) -> u32 {
	(mxcsr & MXCSR_RC_MASK) >> MXCSR_RC_SHIFT
}

/// True when the saved state uses anything other than round-to-nearest.
pub fn is_randomx_rounding(mxcsr: u32) -> bool {
	rounding_control(mxcsr) != 0
}

// region:    --- Tests

#[cfg(test)]
mod tests {
	type Result<T> = core::result::Result<T, Box<dyn std::error::Error>>; // For tests.

	use super::*;

	#[test]
	fn rounding_control_extracts_subfield() -> Result<()> {
		// -- Check
		assert_eq!(rounding_control(0x0000), 0);
		assert_eq!(rounding_control(0x2000), 1);
		assert_eq!(rounding_control(0x4000), 2);
		assert_eq!(rounding_control(0x6000), 3);

		Ok(())
	}

	#[test]
	fn rounding_control_ignores_other_bits() -> Result<()> {
		// -- Setup & Fixtures
		// Default MXCSR after reset is 0x1F80: all exceptions masked,
		// round-to-nearest.
		let fx_reset = 0x1F80;
		let fx_noise = 0x9FFF;

		// -- Check
		assert_eq!(rounding_control(fx_reset), 0);
		assert_eq!(rounding_control(fx_noise), 0);
		assert_eq!(rounding_control(0xFFFF), 3);

		Ok(())
	}

	#[test]
	fn classifier_gates_on_non_default_rounding() -> Result<()> {
		// -- Check
		assert!(!is_randomx_rounding(0x0000));
		assert!(!is_randomx_rounding(0x1F80));
		assert!(is_randomx_rounding(0x2000));
		assert!(is_randomx_rounding(0x6000));

		Ok(())
	}
}

// endregion: --- Tests
