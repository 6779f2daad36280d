//! Armv8-M Mainline (Secure State)
//!
//! # System Control Block (secure view)
//! - AIRCR:   0xE000_ED0C
//! - SHPR3:   0xE000_ED20
//! - CPACR:   0xE000_ED88
//! - NSACR:   0xE000_ED8C
//! - VTOR_NS: 0xE002_ED08 (non-secure alias of VTOR)
//!
//! Register values are computed by pure functions so they can be checked on
//! any host; only the accesses themselves are target specific.

use bitflags::bitflags;

/// Register addresses.
pub mod regs {
    pub const AIRCR: usize = 0xE000_ED0C;
    pub const SHPR3: usize = 0xE000_ED20;
    pub const CPACR: usize = 0xE000_ED88;
    pub const NSACR: usize = 0xE000_ED8C;
    pub const VTOR_NS: usize = 0xE002_ED08;
}

/// Priority bits implemented by the NVIC.
pub const NVIC_PRIO_BITS: u8 = 3;

/// AIRCR write key.
const VECTKEY: u32 = 0x05FA << 16;

/// SVC number that asks the SPM to continue in handler mode.
pub const SVC_SPM_INIT: u8 = 0x0A;

bitflags! {
    /// Application Interrupt and Reset Control Register.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Aircr: u32 {
        const VECTCLRACTIVE = 1 << 1;
        const SYSRESETREQ = 1 << 2;
        const SYSRESETREQS = 1 << 3;
        const PRIGROUP = 0b111 << 8;
        const BFHFNMINS = 1 << 13;
        const PRIS = 1 << 14;
        const ENDIANNESS = 1 << 15;
        const VECTKEY = 0xFFFF << 16;
    }
}

bitflags! {
    /// Non-secure Access Control Register.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Nsacr: u32 {
        const CP10 = 1 << 10;
        const CP11 = 1 << 11;
    }
}

/// CPACR CP10/CP11 full access.
const CPACR_FPU_FULL: u32 = 0xF << 20;

/// AIRCR value that prioritises secure exceptions.
///
/// Sets PRIS and rewrites the vector key. Every other configuration bit,
/// BFHFNMINS included, is carried over from `current`; the write-one
/// request bits are cleared so no reset is requested.
pub fn aircr_prioritize_secure(current: u32) -> u32 {
    let mut value = Aircr::from_bits_retain(current);
    value.remove(Aircr::VECTKEY | Aircr::SYSRESETREQ | Aircr::VECTCLRACTIVE);
    value.insert(Aircr::PRIS);
    value.bits() | VECTKEY
}

/// Shift a priority ordinal into the implemented high bits of a priority
/// byte.
pub const fn encode_priority(priority: u8, prio_bits: u8) -> u8 {
    let mask = (1u16 << prio_bits) - 1;
    (((priority as u16) & mask) << (8 - prio_bits)) as u8
}

/// Lowest priority a secure exception can have while still preempting every
/// non-secure exception once PRIS is set.
pub const fn lowest_secure_priority(prio_bits: u8) -> u8 {
    (1 << (prio_bits - 1)) - 1
}

/// SHPR3 value with the PendSV byte replaced.
pub const fn shpr3_with_pendsv(current: u32, encoded: u8) -> u32 {
    (current & !(0xFF << 16)) | ((encoded as u32) << 16)
}

/// CPACR value granting full FPU access.
pub const fn cpacr_enable_fpu(current: u32) -> u32 {
    current | CPACR_FPU_FULL
}

/// Address usable as a non-secure branch target: bit 0 cleared, which
/// marks the target as non-secure for `BLXNS`/`BXNS`.
pub const fn ns_function_pointer(addr: usize) -> usize {
    addr & !1
}

/// NSACR value granting the non-secure world FPU access.
pub fn nsacr_enable_fpu(current: u32) -> u32 {
    (Nsacr::from_bits_retain(current) | Nsacr::CP10 | Nsacr::CP11).bits()
}

/// Armv8-M secure state architecture layer.
#[derive(Debug, Default)]
pub struct Armv8m {
    ns_entry: usize,
}

impl Armv8m {
    pub const fn new() -> Self {
        Self { ns_entry: 0 }
    }

    /// Non-secure reset handler with bit 0 cleared, known after
    /// `configure_ns_code`.
    ///
    /// This is the address the platform hands to its non-secure jump
    /// (`BXNS`) once the secure partitions are running. Zero until then.
    pub const fn ns_entry(&self) -> usize {
        self.ns_entry
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
mod hw {
    use core::arch::asm;
    use core::ptr;

    /// # Safety
    /// `addr` must be a readable device register.
    #[inline]
    pub unsafe fn read(addr: usize) -> u32 {
        // SAFETY: caller guarantees a valid register address
        unsafe { ptr::read_volatile(addr as *const u32) }
    }

    /// # Safety
    /// `addr` must be a writable device register.
    #[inline]
    pub unsafe fn write(addr: usize, value: u32) {
        // SAFETY: caller guarantees a valid register address
        unsafe { ptr::write_volatile(addr as *mut u32, value) }
    }

    #[inline]
    pub fn barrier() {
        // SAFETY: barriers have no memory side effects beyond ordering
        unsafe { asm!("dsb sy", "isb sy", options(nostack, preserves_flags)) }
    }

    pub fn set_msplim(limit: u32) {
        // SAFETY: MSPLIM only bounds the main stack; the current SP is above
        // the limit by construction of the stack region
        unsafe { asm!("msr MSPLIM, {0}", in(reg) limit, options(nomem, nostack, preserves_flags)) }
    }

    pub fn set_msp_ns(value: u32) {
        // SAFETY: MSP_NS is not used by the secure world
        unsafe { asm!("msr MSP_NS, {0}", in(reg) value, options(nomem, nostack, preserves_flags)) }
    }

    pub fn svc_spm_init() {
        // SAFETY: the SVC handler is installed by the SPM before boot
        unsafe { asm!("svc {id}", id = const super::SVC_SPM_INIT) }
    }

    pub fn wait_for_interrupt() {
        // SAFETY: WFI is always safe to execute
        unsafe { asm!("wfi", options(nomem, nostack)) }
    }
}

#[cfg(all(target_arch = "arm", target_os = "none"))]
impl super::Arch for Armv8m {
    fn set_stack_limit(&mut self, limit: usize) {
        hw::set_msplim(limit as u32);
    }

    fn configure_coprocessors(&mut self) {
        // SAFETY: CPACR and NSACR are architectural SCB registers, accessible
        // from the secure state
        unsafe {
            hw::write(regs::CPACR, cpacr_enable_fpu(hw::read(regs::CPACR)));
            hw::write(regs::NSACR, nsacr_enable_fpu(hw::read(regs::NSACR)));
        }
        hw::barrier();
    }

    fn configure_ns_code(&mut self, ns_code_start: usize) {
        // SAFETY:
        // - VTOR_NS is the architectural non-secure VTOR alias
        // - the non-secure vector table at ns_code_start holds the initial
        //   MSP and reset handler in its first two words
        unsafe {
            hw::write(regs::VTOR_NS, ns_code_start as u32);
            let msp_ns = hw::read(ns_code_start);
            hw::set_msp_ns(msp_ns);
            self.ns_entry = ns_function_pointer(hw::read(ns_code_start + 4) as usize);
        }
        hw::barrier();
    }

    fn prioritize_secure_exceptions(&mut self) {
        // SAFETY: AIRCR is written with the vector key and without a reset
        // request
        unsafe {
            hw::write(regs::AIRCR, aircr_prioritize_secure(hw::read(regs::AIRCR)));
        }
        hw::barrier();
    }

    fn set_pendsv_priority(&mut self) {
        let encoded = encode_priority(lowest_secure_priority(NVIC_PRIO_BITS), NVIC_PRIO_BITS);
        // SAFETY: SHPR3 is an architectural SCB register
        unsafe {
            hw::write(regs::SHPR3, shpr3_with_pendsv(hw::read(regs::SHPR3), encoded));
        }
        hw::barrier();
    }

    fn enter_handler_mode(&mut self) -> ! {
        hw::svc_spm_init();
        // The SPM never returns to the boot thread
        loop {
            hw::wait_for_interrupt();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aircr_sets_pris_and_key() {
        let value = aircr_prioritize_secure(0xFA05_0300);
        assert_eq!(value >> 16, 0x05FA);
        assert_ne!(value & Aircr::PRIS.bits(), 0);
        // PRIGROUP preserved
        assert_eq!(value & Aircr::PRIGROUP.bits(), 0x300);
    }

    #[test]
    fn test_aircr_never_requests_reset() {
        let value = aircr_prioritize_secure(0xFA05_2006);
        assert_eq!(value & Aircr::SYSRESETREQ.bits(), 0);
        assert_eq!(value & Aircr::VECTCLRACTIVE.bits(), 0);
    }

    #[test]
    fn test_aircr_keeps_bus_hard_fault_nmi_target() {
        let value = aircr_prioritize_secure(0xFA05_2000);
        assert_ne!(value & Aircr::BFHFNMINS.bits(), 0);
        assert_ne!(value & Aircr::PRIS.bits(), 0);

        let value = aircr_prioritize_secure(0xFA05_0000);
        assert_eq!(value & Aircr::BFHFNMINS.bits(), 0);
    }

    #[test]
    fn test_ns_entry_clears_thumb_bit() {
        assert_eq!(ns_function_pointer(0x0020_0141), 0x0020_0140);
        assert_eq!(ns_function_pointer(0x0020_0140), 0x0020_0140);
        assert_eq!(Armv8m::new().ns_entry(), 0);
    }

    #[test]
    fn test_pendsv_priority_encoding() {
        assert_eq!(lowest_secure_priority(3), 3);
        assert_eq!(encode_priority(3, 3), 0x60);
        assert_eq!(encode_priority(0, 3), 0);
        assert_eq!(shpr3_with_pendsv(0xAA11_2233, 0x60), 0xAA60_2233);
    }

    #[test]
    fn test_fpu_access() {
        assert_eq!(cpacr_enable_fpu(0), 0x00F0_0000);
        assert_eq!(nsacr_enable_fpu(0x1), 0xC01);
    }
}
