mod checksum;
mod codec_proptest;
