//! Benchmarks for OTA transfer hot paths

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rfota_hid_common::{HidCommonResult, OtaTransport};
use rfota_hid_pxi_protocol::{checksum16, frame, split_objects};
use std::hint::black_box;
use std::num::NonZeroUsize;

fn bench_checksum(c: &mut Criterion) {
    let mut group = c.benchmark_group("checksum");

    for size in [4096usize, 65_536, 262_144] {
        let data: Vec<u8> = (0..size).map(|i| (i % 251) as u8).collect();

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::new("checksum16", size), &data, |b, data| {
            b.iter(|| checksum16(black_box(data)));
        });
    }

    group.finish();
}

fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunking");
    let data: Vec<u8> = (0..262_144usize).map(|i| (i % 251) as u8).collect();

    for mtu in [20usize, 64, 244] {
        let Some(mtu_nz) = NonZeroUsize::new(mtu) else {
            continue;
        };
        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("frame_payload", mtu), &data, |b, data| {
            b.iter(|| {
                let mut frames = 0usize;
                for object in split_objects(black_box(data)) {
                    for packet in object.packets(mtu_nz) {
                        frames += frame::encode_payload(packet).len();
                    }
                }
                frames
            });
        });
    }

    group.finish();
}

/// Transport that acknowledges everything instantly.
struct LoopbackDevice {
    running: u16,
    pending: Option<u8>,
    in_object: usize,
}

impl OtaTransport for LoopbackDevice {
    fn set_feature_report(&mut self, _data: &[u8]) -> HidCommonResult<()> {
        Ok(())
    }

    fn get_feature_report(&mut self, buf: &mut [u8]) -> HidCommonResult<()> {
        // max object 4096, MTU 244, PRN 16, spec check ok
        const CAPS: [u8; 15] = [
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x10, 0x00, 0x00, 0xF4, 0x00, 0x10, 0x00,
            0x01,
        ];
        for (dst, src) in buf.iter_mut().skip(3).zip(CAPS) {
            *dst = src;
        }
        Ok(())
    }

    fn write_raw(&mut self, _offset: u64, data: &[u8]) -> HidCommonResult<()> {
        let body = data.get(1..).unwrap_or_default();
        if self.in_object > 0 {
            self.running = self.running.wrapping_add(checksum16(body));
            self.in_object = self.in_object.saturating_sub(body.len());
            self.pending = Some(0x17);
            return Ok(());
        }
        match body.first() {
            Some(0x25) => {
                let mut size = [0u8; 4];
                for (dst, src) in size.iter_mut().zip(body.iter().skip(5)) {
                    *dst = *src;
                }
                self.in_object = u32::from_le_bytes(size) as usize;
                self.pending = Some(0x25);
            }
            Some(0x18) => self.pending = Some(0x18),
            _ => {}
        }
        Ok(())
    }

    fn read_raw(&mut self, _offset: u64, length: usize) -> HidCommonResult<Vec<u8>> {
        let c = self.running.to_le_bytes();
        let mut note = vec![0x05, self.pending.unwrap_or(0), 0x00, c[0], c[1]];
        note.truncate(length);
        Ok(note)
    }
}

fn bench_transfer(c: &mut Criterion) {
    use rfota_ota::prelude::*;
    use std::time::Duration;

    let mut group = c.benchmark_group("transfer");
    let data: Vec<u8> = (0..131_072usize).map(|i| (i % 251) as u8).collect();
    let image = FirmwareImage::new(data, "1.0.0");
    let config = OtaConfig {
        settle_delay: Duration::ZERO,
        ..OtaConfig::default()
    };

    group.throughput(Throughput::Bytes(image.len() as u64));
    group.bench_function("write_firmware_128k", |b| {
        b.iter(|| -> anyhow::Result<()> {
            let device = LoopbackDevice {
                running: 0,
                pending: None,
                in_object: 0,
            };
            let mut updater = OtaUpdater::new(device, config.clone());
            black_box(updater.write_firmware(&image, &mut NullObserver)?);
            Ok(())
        });
    });

    group.finish();
}

criterion_group!(benches, bench_checksum, bench_chunking, bench_transfer);
criterion_main!(benches);
