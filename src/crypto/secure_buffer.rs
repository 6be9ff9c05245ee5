//! src/crypto/secure_buffer.rs
//! Pinned, zero-on-release storage for key, IV, scratch and passphrase bytes.
//!
//! Both buffer types keep their bytes on the heap so the address handed to
//! `mlock` stays valid for the lifetime of the value. Pinning is best effort:
//! when the process is over its locked-memory limit the buffer still works,
//! it just may be swapped. Zeroing on drop is unconditional.
//!
//! `mlock` works on whole pages and does not nest, while small secrets share
//! pages with each other. Every locked page is therefore reference counted
//! across the process and only `munlock`ed when its last secret is released.

use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicBool, Ordering};

use secure_gate::{Dynamic, Fixed};
use tracing::warn;
use zeroize::Zeroize;

static MLOCK_WARNED: AtomicBool = AtomicBool::new(false);

#[cfg(unix)]
mod pages {
    use std::collections::HashMap;
    use std::sync::{Mutex, MutexGuard, OnceLock};

    /// Page base address -> number of live secrets overlapping that page.
    static LOCKED_PAGES: OnceLock<Mutex<HashMap<usize, usize>>> = OnceLock::new();

    fn table() -> MutexGuard<'static, HashMap<usize, usize>> {
        LOCKED_PAGES
            .get_or_init(|| Mutex::new(HashMap::new()))
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn page_size() -> usize {
        static PAGE_SIZE: OnceLock<usize> = OnceLock::new();
        *PAGE_SIZE.get_or_init(|| {
            // SAFETY: sysconf has no memory-safety preconditions.
            let size = unsafe { libc::sysconf(libc::_SC_PAGESIZE) };
            usize::try_from(size).ok().filter(|&s| s > 0).unwrap_or(4096)
        })
    }

    fn page_range(addr: usize, len: usize) -> impl Iterator<Item = usize> {
        let size = page_size();
        let first = addr & !(size - 1);
        let end = addr + len;
        (first..end).step_by(size)
    }

    /// Lock every page of `addr..addr + len` not already locked by another
    /// secret. All or nothing: on failure the counts taken so far are undone.
    pub(super) fn acquire(addr: usize, len: usize) -> bool {
        let mut table = table();
        let mut taken = Vec::new();
        for page in page_range(addr, len) {
            let count = table.get(&page).copied().unwrap_or(0);
            if count == 0 {
                // SAFETY: `page` is the base of a mapped page that contains
                // part of a live allocation owned by the caller.
                let rc = unsafe { libc::mlock(page as *const libc::c_void, page_size()) };
                if rc != 0 {
                    for page in taken {
                        release_page(&mut table, page);
                    }
                    return false;
                }
            }
            table.insert(page, count + 1);
            taken.push(page);
        }
        true
    }

    /// Drop one reference on every page of the range; unlock pages that no
    /// secret overlaps any more.
    pub(super) fn release(addr: usize, len: usize) {
        let mut table = table();
        for page in page_range(addr, len) {
            release_page(&mut table, page);
        }
    }

    fn release_page(table: &mut HashMap<usize, usize>, page: usize) {
        let Some(count) = table.get_mut(&page) else {
            return;
        };
        *count -= 1;
        if *count == 0 {
            table.remove(&page);
            // SAFETY: the page was locked by `acquire` and is still mapped;
            // munlock only changes residency, never the contents.
            unsafe {
                libc::munlock(page as *const libc::c_void, page_size());
            }
        }
    }

    #[cfg(test)]
    pub(super) fn lock_count(addr: usize) -> usize {
        let page = addr & !(page_size() - 1);
        table().get(&page).copied().unwrap_or(0)
    }
}

#[cfg(unix)]
fn pin(ptr: *const u8, len: usize) -> bool {
    if len == 0 {
        return false;
    }
    let locked = pages::acquire(ptr as usize, len);
    if !locked && !MLOCK_WARNED.swap(true, Ordering::Relaxed) {
        warn!(len, "mlock failed, secret memory may be swapped to disk");
    }
    locked
}

#[cfg(unix)]
fn unpin(ptr: *const u8, len: usize) {
    pages::release(ptr as usize, len);
}

#[cfg(not(unix))]
fn pin(_ptr: *const u8, len: usize) -> bool {
    if len != 0 && !MLOCK_WARNED.swap(true, Ordering::Relaxed) {
        warn!("memory pinning is not supported on this platform");
    }
    false
}

#[cfg(not(unix))]
fn unpin(_ptr: *const u8, _len: usize) {}

/// Fixed-size pinned secret.
///
/// Acquire with [`SecureBuffer::zeroed`] or [`SecureBuffer::new`]; the bytes
/// are wiped and unpinned when the value drops, on every exit path.
pub struct SecureBuffer<const N: usize> {
    inner: Box<Fixed<[u8; N]>>,
    pinned: bool,
}

impl<const N: usize> SecureBuffer<N> {
    #[must_use]
    pub fn zeroed() -> Self {
        let inner = Box::new(Fixed::new([0u8; N]));
        let pinned = pin(inner.expose_secret().as_ptr(), N);
        Self { inner, pinned }
    }

    /// Move `bytes` into pinned storage. The caller's copy is wiped.
    #[must_use]
    pub fn new(mut bytes: [u8; N]) -> Self {
        let mut this = Self::zeroed();
        this.inner.expose_secret_mut().copy_from_slice(&bytes);
        bytes.zeroize();
        this
    }

    #[inline(always)]
    pub fn expose_secret(&self) -> &[u8; N] {
        self.inner.expose_secret()
    }

    #[inline(always)]
    pub fn expose_secret_mut(&mut self) -> &mut [u8; N] {
        self.inner.expose_secret_mut()
    }

    /// Overwrite the contents with zeros, keeping the buffer usable.
    pub fn wipe(&mut self) {
        self.inner.expose_secret_mut().zeroize();
    }

    /// Borrow the buffer through a guard that wipes it when the guard drops.
    ///
    /// Used for caller-owned scratch space that must not keep secrets past a
    /// single call.
    pub fn wipe_on_drop(&mut self) -> WipeOnDrop<'_, N> {
        WipeOnDrop(self)
    }

    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Whether `mlock` succeeded for this buffer.
    pub fn is_pinned(&self) -> bool {
        self.pinned
    }
}

impl<const N: usize> Drop for SecureBuffer<N> {
    fn drop(&mut self) {
        self.wipe();
        if self.pinned {
            unpin(self.inner.expose_secret().as_ptr(), N);
        }
    }
}

impl<const N: usize> fmt::Debug for SecureBuffer<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBuffer")
            .field("len", &N)
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Scoped borrow of a [`SecureBuffer`]; wipes the buffer on drop.
pub struct WipeOnDrop<'a, const N: usize>(&'a mut SecureBuffer<N>);

impl<const N: usize> Deref for WipeOnDrop<'_, N> {
    type Target = SecureBuffer<N>;

    fn deref(&self) -> &Self::Target {
        self.0
    }
}

impl<const N: usize> DerefMut for WipeOnDrop<'_, N> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.0
    }
}

impl<const N: usize> Drop for WipeOnDrop<'_, N> {
    fn drop(&mut self) {
        self.0.wipe();
    }
}

/// Variable-length pinned secret (passphrase bytes).
///
/// The allocation is sized exactly once at construction and never grows, so
/// the pinned range stays valid until drop.
pub struct SecureBytes {
    inner: Dynamic<Vec<u8>>,
    pinned: bool,
}

impl SecureBytes {
    /// Copy `bytes` into a fresh pinned allocation.
    #[must_use]
    pub fn from_slice(bytes: &[u8]) -> Self {
        Self::concat(&[bytes])
    }

    /// Concatenate `parts` directly into one pinned allocation, without
    /// intermediate copies.
    #[must_use]
    pub fn concat(parts: &[&[u8]]) -> Self {
        let len = parts.iter().map(|p| p.len()).sum();
        let mut bytes = Vec::with_capacity(len);
        let pinned = pin(bytes.as_ptr(), bytes.capacity());
        for part in parts {
            bytes.extend_from_slice(part);
        }
        Self {
            inner: Dynamic::new(bytes),
            pinned,
        }
    }

    #[inline(always)]
    pub fn expose_secret(&self) -> &[u8] {
        self.inner.expose_secret().as_slice()
    }

    pub fn len(&self) -> usize {
        self.inner.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_pinned(&self) -> bool {
        self.pinned
    }
}

impl Drop for SecureBytes {
    fn drop(&mut self) {
        let bytes = self.inner.expose_secret_mut();
        let (ptr, capacity) = (bytes.as_ptr(), bytes.capacity());
        bytes.zeroize();
        if self.pinned {
            unpin(ptr, capacity);
        }
    }
}

impl fmt::Debug for SecureBytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecureBytes")
            .field("len", &self.len())
            .field("bytes", &"[REDACTED]")
            .finish()
    }
}

/// Number of live secrets holding the lock on the page containing `ptr`.
#[cfg(all(test, unix))]
pub(crate) fn page_lock_count(ptr: *const u8) -> usize {
    pages::lock_count(ptr as usize)
}

/// `Locked:` size in kB of the mapping containing `ptr`, from `/proc/self/smaps`.
#[cfg(all(test, target_os = "linux"))]
pub(crate) fn mapping_locked_kb(ptr: *const u8) -> Option<u64> {
    let addr = ptr as usize;
    let smaps = std::fs::read_to_string("/proc/self/smaps").ok()?;
    let mut inside = false;
    for line in smaps.lines() {
        let first = line.split_whitespace().next().unwrap_or("");
        if let Some((start, end)) = first.split_once('-') {
            if let (Ok(start), Ok(end)) = (
                usize::from_str_radix(start, 16),
                usize::from_str_radix(end, 16),
            ) {
                inside = (start..end).contains(&addr);
                continue;
            }
        }
        if inside {
            if let Some(rest) = line.strip_prefix("Locked:") {
                return rest.trim().trim_end_matches("kB").trim().parse().ok();
            }
        }
    }
    None
}
